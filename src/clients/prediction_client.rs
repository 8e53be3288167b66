//! Provides the `PredictionClient`, obtained via [`ClimateOdds::prediction()`].

use crate::climate_odds::ClimateOdds;
use crate::error::ClimateError;
use crate::prediction::blender::{blend, HistoricalStatistics, PredictionResult, PREDICTION_PARAMETERS};
use crate::prediction::rules::ThresholdConfig;
use crate::stats::window::normalized_day_of_year;
use crate::types::coordinate::Coordinate;
use crate::validation;
use bon::bon;
use chrono::{Datelike, NaiveDate};
use log::warn;

/// A client builder for point predictions.
///
/// Created by [`ClimateOdds::prediction()`]. Calling `.at(coordinate)` starts
/// the builder; `.call().await` runs it and returns a [`PredictionResult`].
pub struct PredictionClient<'a> {
    engine: &'a ClimateOdds,
}

#[bon] // enables the builder behind `at()`
impl<'a> PredictionClient<'a> {
    pub(crate) fn new(engine: &'a ClimateOdds) -> Self {
        Self { engine }
    }

    /// Predicts the weather for a coordinate on a calendar date.
    ///
    /// Optional arguments:
    /// *   `.date(NaiveDate)`: target date (default: the engine's "today").
    /// *   `.thresholds(ThresholdConfig)`: advisory thresholds for this request
    ///     (default: the engine configuration's).
    /// *   `.window_days(u32)` / `.years_back(u32)`: history window overrides.
    ///
    /// When history is unavailable the prediction is built from the seasonal
    /// model and tagged `seasonal-fallback`; that is never an error.
    ///
    /// # Arguments (Initial Builder Method)
    ///
    /// * `coordinate` - The [`Coordinate`] to predict for.
    ///
    /// # Returns
    ///
    /// After `.call().await`, a [`PredictionResult`] with point values, heat
    /// index, wind chill, advisory comments and precautions. The air-quality
    /// fields are only present when a scorer is loaded.
    ///
    /// # Errors
    ///
    /// Only [`ClimateError::InvalidInput`] for out-of-range overrides or
    /// non-finite thresholds.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use climate_odds::{ClimateOdds, Coordinate, ThresholdConfig};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let engine = ClimateOdds::new().await?;
    /// let prediction = engine
    ///     .prediction()
    ///     .at(Coordinate::new(19.07, 72.88)?)
    ///     .thresholds(ThresholdConfig { very_hot: 33.0, ..Default::default() })
    ///     .call()
    ///     .await?;
    /// for comment in &prediction.comments {
    ///     println!("{comment}");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = at)] // entry point takes the coordinate
    #[doc(hidden)] // hide the generated `build_at` from docs
    pub async fn build_at(
        &self,
        #[builder(start_fn)] coordinate: Coordinate,
        date: Option<NaiveDate>,
        thresholds: Option<ThresholdConfig>,
        window_days: Option<u32>,
        years_back: Option<u32>,
    ) -> Result<PredictionResult, ClimateError> {
        let config = self.engine.config();
        let window_days = validation::window_days(window_days.unwrap_or(config.window_days))?;
        let years_back = validation::years(years_back.unwrap_or(config.years_back))?;
        let thresholds = thresholds.unwrap_or_else(|| config.thresholds.clone());
        thresholds.validate()?;

        let date = date.unwrap_or_else(|| self.engine.today());
        let target_day = normalized_day_of_year(date);

        let history = match self
            .engine
            .fetch_history(
                coordinate,
                target_day,
                window_days,
                years_back,
                date.year(),
                &PREDICTION_PARAMETERS,
            )
            .await
        {
            Ok(samples) => Some(HistoricalStatistics::from_samples(
                &samples,
                target_day,
                window_days,
                config.wet_day_threshold_mm,
            )),
            Err(e) => {
                warn!("Historical data unavailable for {}, predicting from seasonal model: {}", coordinate, e);
                None
            }
        };

        Ok(blend(
            coordinate,
            date,
            history.as_ref(),
            &thresholds,
            self.engine.scorer(),
            config.history_rain_weight,
        ))
    }
}
