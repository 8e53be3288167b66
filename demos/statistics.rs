//! Prints windowed statistics and a few threshold probabilities for
//! Amsterdam in early July.

use climate_odds::{ClimateOdds, Coordinate, Parameter, ThresholdQuery};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let engine = ClimateOdds::new().await?;
    let amsterdam = Coordinate::new(52.37, 4.90)?;

    let report = engine
        .statistics()
        .at(amsterdam)
        .day_of_year(185)
        .years_back(15)
        .call()
        .await?;
    println!(
        "{} years around day {} (±{} days), {}",
        report.years_analyzed, report.day_of_year, report.window_days, report.data_source
    );
    for (parameter, summary) in &report.statistics {
        match &summary.stats {
            Some(stats) => println!(
                "{:<40} n={:<4} mean={:>7.2} p25={:>7.2} p75={:>7.2} p95={:>7.2}",
                parameter.label(),
                summary.sample_count,
                stats.mean,
                stats.percentile_25,
                stats.percentile_75,
                stats.percentile_95
            ),
            None => println!("{:<40} no data", parameter.label()),
        }
    }

    let odds = engine
        .probability()
        .at(amsterdam)
        .day_of_year(185)
        .thresholds(vec![
            ThresholdQuery::at_least(Parameter::TemperatureMax, 30.0),
            ThresholdQuery::at_least(Parameter::Precipitation, 10.0),
            ThresholdQuery::at_least(Parameter::WindSpeed, 8.0),
        ])
        .call()
        .await?;
    for result in &odds.results {
        match result.probability {
            Some(p) => println!(
                "P({} {} {}) = {}% ({}/{})",
                result.parameter, result.direction, result.threshold, p, result.exceed_count, result.sample_count
            ),
            None => println!("P({} {} {}) unavailable", result.parameter, result.direction, result.threshold),
        }
    }

    Ok(())
}
