//! Provides the `SeriesClient`, obtained via [`ClimateOdds::timeseries()`].

use crate::climate_odds::ClimateOdds;
use crate::error::ClimateError;
use crate::export::series::{series, SeriesPoint};
use crate::types::coordinate::Coordinate;
use crate::types::data_source::DataSource;
use crate::types::parameter::Parameter;
use crate::validation::{self, InvalidInput};
use bon::bon;
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Daily values of one parameter, ready for charting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesReport {
    pub coordinate: Coordinate,
    pub parameter: Parameter,
    /// Human-readable parameter label, e.g. `Temperature at 2 Meters (°C)`.
    pub parameter_name: String,
    pub years: u32,
    pub data_source: DataSource,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub points: Vec<SeriesPoint>,
}

/// A client builder for per-parameter time series.
pub struct SeriesClient<'a> {
    engine: &'a ClimateOdds,
}

#[bon]
impl<'a> SeriesClient<'a> {
    pub(crate) fn new(engine: &'a ClimateOdds) -> Self {
        Self { engine }
    }

    /// Fetches `years × 365` days of one parameter, ending today.
    ///
    /// Optional arguments:
    /// *   `.parameter(Parameter)`: default [`Parameter::TemperatureMean`].
    /// *   `.years(u32)`: 1..=40, default from the engine configuration.
    ///
    /// Days without a value for the parameter are left out of `points`.
    ///
    /// # Returns
    ///
    /// A [`TimeSeriesReport`] covering `today - years × 365 ..= today`, with
    /// points in date order.
    ///
    /// # Errors
    ///
    /// [`ClimateError::InvalidInput`] if `years` is out of range or the span
    /// reaches before the first representable date.
    #[builder(start_fn = at)]
    #[doc(hidden)]
    pub async fn build_at(
        &self,
        #[builder(start_fn)] coordinate: Coordinate,
        parameter: Option<Parameter>,
        years: Option<u32>,
    ) -> Result<TimeSeriesReport, ClimateError> {
        let parameter = parameter.unwrap_or(Parameter::TemperatureMean);
        let years = validation::years(years.unwrap_or(self.engine.config().timeseries_years))?;
        let end = self.engine.today();
        let start = end
            .checked_sub_signed(Duration::days(i64::from(years) * 365))
            .ok_or(InvalidInput::InvalidPeriod)?;

        let loaded = self
            .engine
            .load_range(coordinate, start, end, &[parameter])
            .await;

        Ok(TimeSeriesReport {
            coordinate,
            parameter,
            parameter_name: parameter.label(),
            years,
            data_source: loaded.data_source,
            start,
            end,
            points: series(&loaded.samples, parameter).to_points(),
        })
    }
}
