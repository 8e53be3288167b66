//! Predicts the weather for Delhi on a monsoon day and prints the advice.
//!
//! cargo run --example predict

use climate_odds::{parse_date, ClimateError, ClimateOdds, Coordinate, ThresholdConfig};

#[tokio::main]
async fn main() -> Result<(), ClimateError> {
    let engine = ClimateOdds::new().await?;
    let delhi = Coordinate::new(28.61, 77.21)?;

    let prediction = engine
        .prediction()
        .at(delhi)
        .date(parse_date("2025-08-20")?)
        .thresholds(ThresholdConfig {
            very_hot: 33.0,
            ..Default::default()
        })
        .call()
        .await?;

    println!(
        "{} on {} ({}, {})",
        prediction.location, prediction.date, prediction.season, prediction.data_source
    );
    println!(
        "Rain {}% | {}°C ({} to {}) | humidity {}% | wind {} m/s | {} hPa",
        prediction.rain_probability,
        prediction.temperature,
        prediction.temperature_min,
        prediction.temperature_max,
        prediction.humidity,
        prediction.wind_speed,
        prediction.pressure,
    );
    println!(
        "Heat index {}°C, wind chill {}°C",
        prediction.heat_index, prediction.wind_chill
    );
    if let (Some(aqi), Some(category)) = (prediction.air_quality_index, prediction.air_quality_category) {
        println!("AQI {aqi} ({category})");
    }

    for comment in &prediction.comments {
        println!("- {comment}");
    }
    for group in &prediction.precautions {
        println!("{}:", group.title);
        for item in &group.items {
            println!("  * {item}");
        }
    }

    Ok(())
}
