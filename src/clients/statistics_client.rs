//! Provides the `StatisticsClient`, obtained via [`ClimateOdds::statistics()`].

use crate::climate_odds::ClimateOdds;
use crate::error::ClimateError;
use crate::stats::summary::{summarize, StatisticsSummary};
use crate::stats::window::normalized_day_of_year;
use crate::types::coordinate::Coordinate;
use crate::types::data_source::DataSource;
use crate::types::parameter::Parameter;
use crate::validation::{self, InvalidInput};
use bon::bon;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-parameter summaries around a day of year, plus the query echoed back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsReport {
    pub coordinate: Coordinate,
    pub day_of_year: u32,
    pub window_days: u32,
    pub years_analyzed: u32,
    pub data_source: DataSource,
    pub statistics: BTreeMap<Parameter, StatisticsSummary>,
}

/// A client builder for windowed summary statistics.
///
/// Instances are created by calling [`ClimateOdds::statistics()`]. Start with
/// `.at(coordinate)`, set any optional arguments, then `.call().await`.
pub struct StatisticsClient<'a> {
    /// The engine whose provider and defaults serve the request.
    engine: &'a ClimateOdds,
}

#[bon] // builder for the optional arguments of `at()`
impl<'a> StatisticsClient<'a> {
    /// Creates a new `StatisticsClient`.
    ///
    /// Called by [`ClimateOdds::statistics()`], not directly by users.
    pub(crate) fn new(engine: &'a ClimateOdds) -> Self {
        Self { engine }
    }

    /// Summarizes the last `years_back` complete years around a day of year.
    ///
    /// Optional arguments:
    /// *   `.day_of_year(u32)`: 1..=366 (default: today's).
    /// *   `.window_days(u32)`, `.years_back(u32)`: overrides of the engine defaults.
    /// *   `.parameters(Vec<Parameter>)`: which parameters (default: all).
    ///
    /// A parameter without any windowed value gets a no-data summary; the
    /// request still succeeds.
    ///
    /// # Arguments (Initial Builder Method)
    ///
    /// * `coordinate` - The [`Coordinate`] to summarize history for.
    ///
    /// # Returns
    ///
    /// After `.call().await`, a [`StatisticsReport`] with one
    /// [`StatisticsSummary`] per requested parameter, in parameter order. The
    /// report's `data_source` is `seasonal-fallback` when the upstream was
    /// unavailable and the summaries were computed over synthetic samples.
    ///
    /// # Errors
    ///
    /// *   [`ClimateError::InvalidInput`]: `day_of_year` outside 1..=366,
    ///     `window_days` or `years_back` out of range, or an empty parameter list.
    ///
    /// An unreachable upstream is not an error.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use climate_odds::{ClimateOdds, Coordinate, Parameter};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let engine = ClimateOdds::new().await?;
    /// let report = engine
    ///     .statistics()
    ///     .at(Coordinate::new(52.37, 4.90)?)
    ///     .day_of_year(185)
    ///     .parameters(vec![Parameter::TemperatureMax, Parameter::Precipitation])
    ///     .call()
    ///     .await?;
    /// println!("{}", serde_json::to_string_pretty(&report)?);
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = at)] // entry point takes the coordinate
    #[doc(hidden)] // callers use `at(...)`, not `build_at`
    pub async fn build_at(
        &self,
        #[builder(start_fn)] coordinate: Coordinate,
        day_of_year: Option<u32>,
        window_days: Option<u32>,
        years_back: Option<u32>,
        parameters: Option<Vec<Parameter>>,
    ) -> Result<StatisticsReport, ClimateError> {
        let config = self.engine.config();
        let day_of_year = match day_of_year {
            Some(day) => validation::day_of_year(day)?,
            None => normalized_day_of_year(self.engine.today()),
        };
        let window_days = validation::window_days(window_days.unwrap_or(config.window_days))?;
        let years_back = validation::years(years_back.unwrap_or(config.years_back))?;
        let parameters = parameters.unwrap_or_else(|| Parameter::ALL.to_vec());
        if parameters.is_empty() {
            return Err(InvalidInput::NoParameters.into());
        }

        let loaded = self
            .engine
            .load_history(coordinate, day_of_year, window_days, years_back, &parameters)
            .await;

        Ok(StatisticsReport {
            coordinate,
            day_of_year,
            window_days,
            years_analyzed: years_back,
            data_source: loaded.data_source,
            statistics: summarize(&loaded.samples, day_of_year, window_days, &parameters),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::climate_odds::tests::{delhi, reference_config, ConstantProvider, OfflineProvider};
    use crate::{ClimateError, ClimateOdds, DataSource, InvalidInput, Parameter};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_statistics_from_history() -> Result<(), ClimateError> {
        let engine = ClimateOdds::with_parts(Arc::new(ConstantProvider::new(31.0)), None, reference_config())?;
        let report = engine
            .statistics()
            .at(delhi())
            .day_of_year(185)
            .years_back(3)
            .parameters(vec![Parameter::TemperatureMax])
            .call()
            .await?;
        assert_eq!(report.data_source, DataSource::Historical);
        assert_eq!(report.years_analyzed, 3);
        let summary = &report.statistics[&Parameter::TemperatureMax];
        assert_eq!(summary.sample_count, 3 * 15);
        assert_eq!(summary.mean(), Some(31.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_statistics_fall_back_with_ordered_percentiles() -> Result<(), ClimateError> {
        let engine = ClimateOdds::with_parts(Arc::new(OfflineProvider::default()), None, reference_config())?;
        let report = engine.statistics().at(delhi()).day_of_year(2).call().await?;
        assert_eq!(report.data_source, DataSource::SeasonalFallback);
        assert_eq!(report.statistics.len(), Parameter::ALL.len());
        for summary in report.statistics.values() {
            let stats = summary.stats.as_ref().ok_or(InvalidInput::NoParameters)?;
            assert!(stats.percentile_95 >= stats.percentile_75);
            assert!(stats.percentile_75 >= stats.median);
            assert!(stats.median >= stats.percentile_25);
            assert!(stats.min <= stats.mean && stats.mean <= stats.max);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_arguments_rejected() -> Result<(), ClimateError> {
        let engine = ClimateOdds::with_parts(Arc::new(OfflineProvider::default()), None, reference_config())?;
        let result = engine.statistics().at(delhi()).day_of_year(400).call().await;
        assert!(matches!(
            result,
            Err(ClimateError::InvalidInput(InvalidInput::DayOfYearOutOfRange(400)))
        ));
        let result = engine.statistics().at(delhi()).parameters(vec![]).call().await;
        assert!(matches!(
            result,
            Err(ClimateError::InvalidInput(InvalidInput::NoParameters))
        ));
        Ok(())
    }
}
