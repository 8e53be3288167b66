//! Provides the `ProbabilityClient`, obtained via [`ClimateOdds::probability()`].

use crate::climate_odds::ClimateOdds;
use crate::error::ClimateError;
use crate::stats::threshold::{probability, ThresholdQuery, ThresholdResult};
use crate::stats::window::normalized_day_of_year;
use crate::types::coordinate::Coordinate;
use crate::types::data_source::DataSource;
use crate::types::parameter::Parameter;
use crate::validation::{self, InvalidInput};
use bon::bon;
use serde::Serialize;

/// Threshold probabilities for one coordinate and day of year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityReport {
    pub coordinate: Coordinate,
    pub day_of_year: u32,
    pub window_days: u32,
    pub years_analyzed: u32,
    pub data_source: DataSource,
    /// One entry per query, in query order.
    pub results: Vec<ThresholdResult>,
}

/// A client builder for threshold exceedance probabilities.
pub struct ProbabilityClient<'a> {
    engine: &'a ClimateOdds,
}

#[bon] // builder for `at()`
impl<'a> ProbabilityClient<'a> {
    pub(crate) fn new(engine: &'a ClimateOdds) -> Self {
        Self { engine }
    }

    /// Estimates, per query, how often the threshold was met in the window.
    ///
    /// `.thresholds(Vec<ThresholdQuery>)` is required and must not be empty.
    /// `.day_of_year`, `.window_days` and `.years_back` are optional as for
    /// [`ClimateOdds::statistics()`]. History for all queried parameters is
    /// fetched with a single upstream request.
    ///
    /// # Returns
    ///
    /// A [`ProbabilityReport`] whose `results` follow the order of
    /// `thresholds`. A result's `probability` is `None` when the window holds
    /// no value for its parameter.
    ///
    /// # Errors
    ///
    /// [`ClimateError::InvalidInput`] for an empty query list, a non-finite
    /// threshold, or an out-of-range day, window or year count.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use climate_odds::{ClimateOdds, Coordinate, Parameter, ThresholdQuery};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let engine = ClimateOdds::new().await?;
    /// let report = engine
    ///     .probability()
    ///     .at(Coordinate::new(28.61, 77.21)?)
    ///     .day_of_year(185)
    ///     .thresholds(vec![
    ///         ThresholdQuery::at_least(Parameter::TemperatureMax, 32.0),
    ///         ThresholdQuery::at_most(Parameter::TemperatureMin, 5.0),
    ///     ])
    ///     .call()
    ///     .await?;
    /// for result in &report.results {
    ///     println!("{} {} {}: {:?}%", result.parameter, result.direction, result.threshold, result.probability);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = at)] // entry point takes the coordinate
    #[doc(hidden)]
    pub async fn build_at(
        &self,
        #[builder(start_fn)] coordinate: Coordinate,
        thresholds: Vec<ThresholdQuery>,
        day_of_year: Option<u32>,
        window_days: Option<u32>,
        years_back: Option<u32>,
    ) -> Result<ProbabilityReport, ClimateError> {
        let config = self.engine.config();
        if thresholds.is_empty() {
            return Err(InvalidInput::EmptyThresholds.into());
        }
        for query in &thresholds {
            query.validate()?;
        }
        let day_of_year = match day_of_year {
            Some(day) => validation::day_of_year(day)?,
            None => normalized_day_of_year(self.engine.today()),
        };
        let window_days = validation::window_days(window_days.unwrap_or(config.window_days))?;
        let years_back = validation::years(years_back.unwrap_or(config.years_back))?;

        let mut parameters: Vec<Parameter> = thresholds.iter().map(|q| q.parameter).collect();
        parameters.sort_unstable();
        parameters.dedup();

        let loaded = self
            .engine
            .load_history(coordinate, day_of_year, window_days, years_back, &parameters)
            .await;

        let results = thresholds
            .into_iter()
            .map(|query| probability(&loaded.samples, day_of_year, window_days, query))
            .collect();

        Ok(ProbabilityReport {
            coordinate,
            day_of_year,
            window_days,
            years_analyzed: years_back,
            data_source: loaded.data_source,
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::climate_odds::tests::{delhi, reference_config, ConstantProvider, OfflineProvider};
    use crate::{ClimateError, ClimateOdds, DataSource, InvalidInput, Parameter, ThresholdQuery};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_probabilities_in_query_order() -> Result<(), ClimateError> {
        let provider = Arc::new(ConstantProvider::new(32.0));
        let engine = ClimateOdds::with_parts(provider.clone(), None, reference_config())?;
        let report = engine
            .probability()
            .at(delhi())
            .day_of_year(185)
            .thresholds(vec![
                ThresholdQuery::at_least(Parameter::TemperatureMax, 32.0),
                ThresholdQuery::at_least(Parameter::TemperatureMax, 32.1),
                ThresholdQuery::at_most(Parameter::TemperatureMin, 5.0),
            ])
            .call()
            .await?;
        assert_eq!(report.data_source, DataSource::Historical);
        let probabilities: Vec<Option<f64>> = report.results.iter().map(|r| r.probability).collect();
        assert_eq!(probabilities, vec![Some(100.0), Some(0.0), Some(0.0)]);
        // Two queries on one parameter still make a single request.
        assert_eq!(provider.ranges.lock().map(|r| r.len()).unwrap_or(0), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_monotonic_in_threshold_on_fallback() -> Result<(), ClimateError> {
        let engine = ClimateOdds::with_parts(Arc::new(OfflineProvider::default()), None, reference_config())?;
        let thresholds = (20..40)
            .map(|t| ThresholdQuery::at_least(Parameter::TemperatureMax, f64::from(t)))
            .collect();
        let report = engine
            .probability()
            .at(delhi())
            .day_of_year(150)
            .thresholds(thresholds)
            .call()
            .await?;
        assert_eq!(report.data_source, DataSource::SeasonalFallback);
        let probabilities: Vec<f64> = report.results.iter().filter_map(|r| r.probability).collect();
        assert_eq!(probabilities.len(), 20);
        assert!(probabilities.windows(2).all(|pair| pair[1] <= pair[0]));
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_thresholds_rejected() -> Result<(), ClimateError> {
        let engine = ClimateOdds::with_parts(Arc::new(OfflineProvider::default()), None, reference_config())?;
        let result = engine.probability().at(delhi()).thresholds(vec![]).call().await;
        assert!(matches!(
            result,
            Err(ClimateError::InvalidInput(InvalidInput::EmptyThresholds))
        ));
        Ok(())
    }
}
