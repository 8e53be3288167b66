//! Provides the `ExportClient`, obtained via [`ClimateOdds::export()`].

use crate::climate_odds::ClimateOdds;
use crate::error::ClimateError;
use crate::export::table::{file_name, tabulate_range, ExportFile, ExportFormat};
use crate::types::any_date::{AnyDate, DateSpan};
use crate::types::coordinate::Coordinate;
use crate::types::parameter::Parameter;
use crate::validation::{self, InvalidInput};
use bon::bon;
use chrono::NaiveDate;
use log::info;

/// A client builder for bulk CSV/JSON downloads.
pub struct ExportClient<'a> {
    engine: &'a ClimateOdds,
}

#[bon]
impl<'a> ExportClient<'a> {
    pub(crate) fn new(engine: &'a ClimateOdds) -> Self {
        Self { engine }
    }

    /// Renders every parameter for each day in `start..=end`.
    ///
    /// `.start(NaiveDate)` and `.end(NaiveDate)` are required; `.format` defaults
    /// to CSV. Every day in the range gets a row, with empty cells where no
    /// value exists.
    ///
    /// # Errors
    ///
    /// [`ClimateError::InvalidInput`] if `start > end` or the range exceeds
    /// 40 years, [`ClimateError::Export`] if the table cannot be rendered.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use climate_odds::{ClimateOdds, Coordinate, ExportFormat, parse_date};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let engine = ClimateOdds::new().await?;
    /// let file = engine
    ///     .export()
    ///     .at(Coordinate::new(28.61, 77.21)?)
    ///     .start(parse_date("2024-01-01")?)
    ///     .end(parse_date("2024-01-31")?)
    ///     .format(ExportFormat::Json)
    ///     .call()
    ///     .await?;
    /// std::fs::write(&file.file_name, &file.bytes)?;
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = at)] // entry point takes the coordinate
    #[doc(hidden)]
    pub async fn build_at(
        &self,
        #[builder(start_fn)] coordinate: Coordinate,
        start: NaiveDate,
        end: NaiveDate,
        format: Option<ExportFormat>,
    ) -> Result<ExportFile, ClimateError> {
        validation::date_range(start, end)?;
        let format = format.unwrap_or(ExportFormat::Csv);
        let span = DateSpan { start, end };

        let loaded = self
            .engine
            .load_range(coordinate, start, end, &Parameter::ALL)
            .await;
        let table = tabulate_range(&loaded.samples, span);
        let bytes = table.write(coordinate, format)?;
        info!("Exported {} rows as {} for {}", table.len(), format, coordinate);

        Ok(ExportFile {
            file_name: file_name(coordinate, span, format),
            mime_type: format.mime_type(),
            bytes,
            data_source: loaded.data_source,
            row_count: table.len(),
        })
    }

    /// Exports the whole of a period such as [`crate::Year`], [`crate::Month`]
    /// or a single date.
    pub async fn period(
        &self,
        coordinate: Coordinate,
        period: impl AnyDate,
        format: ExportFormat,
    ) -> Result<ExportFile, ClimateError> {
        let span = period
            .get_date_range()
            .ok_or(InvalidInput::InvalidPeriod)?;
        self.at(coordinate)
            .start(span.start)
            .end(span.end)
            .format(format)
            .call()
            .await
    }
}
