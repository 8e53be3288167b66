//! Provides the `CurrentClient` for the latest observed conditions at a
//! coordinate.
//!
//! Obtained via [`ClimateOdds::current()`]. Upstream daily data lags real time
//! by a few days, so the client looks back over a short range and reports the
//! most recent day that has any observation.

use crate::climate_odds::ClimateOdds;
use crate::error::ClimateError;
use crate::prediction::blender::PREDICTION_PARAMETERS;
use crate::types::coordinate::Coordinate;
use crate::types::data_source::DataSource;
use crate::types::parameter::Parameter;
use crate::types::sample::ClimateSample;
use crate::validation::{self, InvalidInput};
use bon::bon;
use chrono::{Duration, NaiveDate};
use log::{info, warn};
use serde::Serialize;

/// Default look-back for [`CurrentClient`], in days.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;

/// The most recent day with observations. A field is `None` when that day has
/// no value for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub coordinate: Coordinate,
    pub date: NaiveDate,
    pub data_source: DataSource,
    pub temperature: Option<f64>,
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
    pub precipitation: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub pressure: Option<f64>,
}

impl CurrentConditions {
    fn from_sample(coordinate: Coordinate, sample: &ClimateSample, data_source: DataSource) -> Self {
        let value = |parameter| sample.get(parameter).filter(|v: &f64| v.is_finite());
        Self {
            coordinate,
            date: sample.date,
            data_source,
            temperature: value(Parameter::TemperatureMean),
            temperature_max: value(Parameter::TemperatureMax),
            temperature_min: value(Parameter::TemperatureMin),
            precipitation: value(Parameter::Precipitation),
            humidity: value(Parameter::RelativeHumidity),
            wind_speed: value(Parameter::WindSpeed),
            pressure: value(Parameter::SurfacePressure),
        }
    }
}

/// A client builder for current conditions.
///
/// Created by [`ClimateOdds::current()`]; start the request with `.at(coordinate)`
/// and finish it with `.call().await`.
pub struct CurrentClient<'a> {
    /// The engine that owns the provider and the fallback model.
    engine: &'a ClimateOdds,
}

#[bon] // builder for the optional look-back
impl<'a> CurrentClient<'a> {
    /// Creates a new `CurrentClient`.
    ///
    /// Called by [`ClimateOdds::current()`], not directly by users.
    pub(crate) fn new(engine: &'a ClimateOdds) -> Self {
        Self { engine }
    }

    /// Initiates a request for the latest observed day at a coordinate.
    ///
    /// You can optionally specify:
    /// *   `.days(u32)`: how far back to look, 1..=31 (default: 7).
    ///
    /// Finally, call `.call().await` on the builder to run the request.
    ///
    /// # Arguments (Initial Builder Method)
    ///
    /// * `coordinate` - The [`Coordinate`] to report on.
    ///
    /// # Returns
    ///
    /// After `.call().await`, the [`CurrentConditions`] of the most recent day
    /// in `today - days ..= today` that has any value. When the upstream is
    /// unavailable or returns nothing, the day is synthesized from the seasonal
    /// model for today and tagged [`DataSource::SeasonalFallback`].
    ///
    /// # Errors
    ///
    /// *   [`ClimateError::InvalidInput`]: `days` is out of range, or the
    ///     look-back reaches before the first representable date.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use climate_odds::{ClimateOdds, Coordinate};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let engine = ClimateOdds::new().await?;
    /// let now = engine
    ///     .current()
    ///     .at(Coordinate::new(28.61, 77.21)?) // Required: where
    ///     .days(14)                           // Optional: look-back
    ///     .call()
    ///     .await?;
    /// println!("{}: {:?} °C ({})", now.date, now.temperature, now.data_source);
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = at)] // entry point takes the coordinate
    #[doc(hidden)] // callers use `at(...)`, not `build_at`
    pub async fn build_at(
        &self,
        #[builder(start_fn)] coordinate: Coordinate,
        days: Option<u32>,
    ) -> Result<CurrentConditions, ClimateError> {
        let days = validation::lookback_days(days.unwrap_or(DEFAULT_LOOKBACK_DAYS))?;
        let end = self.engine.today();
        let start = end
            .checked_sub_signed(Duration::days(i64::from(days)))
            .ok_or(InvalidInput::InvalidPeriod)?;

        let loaded = self
            .engine
            .load_range(coordinate, start, end, &PREDICTION_PARAMETERS)
            .await;

        let conditions = match loaded.samples.iter().rev().find(|s| !s.is_empty()) {
            Some(latest) => CurrentConditions::from_sample(coordinate, latest, loaded.data_source),
            None => {
                warn!("No observed day for {} between {} and {}, synthesizing {}", coordinate, start, end, end);
                let sample = self
                    .engine
                    .synthesizer()
                    .sample(coordinate, end, &PREDICTION_PARAMETERS);
                CurrentConditions::from_sample(coordinate, &sample, DataSource::SeasonalFallback)
            }
        };
        info!("Current conditions for {} from {} ({})", coordinate, conditions.date, conditions.data_source);
        Ok(conditions)
    }
}
