//! Flat, row-per-day tables for bulk download.

use crate::types::any_date::DateSpan;
use crate::types::coordinate::Coordinate;
use crate::types::data_source::DataSource;
use crate::types::parameter::Parameter;
use crate::types::sample::ClimateSample;
use crate::validation::InvalidInput;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to build export table")]
    Frame(#[source] PolarsError),

    #[error("Failed to write {format} export")]
    Write {
        format: ExportFormat,
        #[source]
        source: PolarsError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = InvalidInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(InvalidInput::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A rendered export, ready to hand to a download response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportFile {
    pub file_name: String,
    pub mime_type: &'static str,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub data_source: DataSource,
    pub row_count: usize,
}

/// One row per date and one column per parameter; `None` is an empty cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleTable {
    pub columns: Vec<Parameter>,
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<Vec<Option<f64>>>,
}

impl SampleTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The table as a `DataFrame` with `date, latitude, longitude` leading
    /// columns. Dates are ISO strings.
    pub fn to_frame(&self, coordinate: Coordinate) -> Result<DataFrame, ExportError> {
        let n = self.len();
        let mut columns = Vec::with_capacity(self.columns.len() + 3);
        columns.push(Column::new(
            "date".into(),
            self.dates
                .iter()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .collect::<Vec<String>>(),
        ));
        columns.push(Column::new("latitude".into(), vec![coordinate.latitude(); n]));
        columns.push(Column::new("longitude".into(), vec![coordinate.longitude(); n]));
        for (index, parameter) in self.columns.iter().enumerate() {
            let values: Vec<Option<f64>> = self.rows.iter().map(|row| row[index]).collect();
            columns.push(Column::new(parameter.code().into(), values));
        }
        DataFrame::new(columns).map_err(ExportError::Frame)
    }

    pub fn write(&self, coordinate: Coordinate, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        let mut df = self.to_frame(coordinate)?;
        let mut buf = Vec::new();
        let written = match format {
            ExportFormat::Csv => CsvWriter::new(&mut buf)
                .include_header(true)
                .finish(&mut df),
            ExportFormat::Json => JsonWriter::new(&mut buf)
                .with_json_format(JsonFormat::Json)
                .finish(&mut df),
        };
        written.map_err(|source| ExportError::Write { format, source })?;
        Ok(buf)
    }
}

fn by_date(samples: &[ClimateSample]) -> BTreeMap<NaiveDate, &ClimateSample> {
    samples.iter().map(|s| (s.date, s)).collect()
}

fn row(sample: Option<&&ClimateSample>) -> Vec<Option<f64>> {
    Parameter::ALL
        .iter()
        .map(|p| sample.and_then(|s| s.get(*p)))
        .collect()
}

/// One row per distinct sample date, in date order.
pub fn tabulate(samples: &[ClimateSample]) -> SampleTable {
    let indexed = by_date(samples);
    SampleTable {
        columns: Parameter::ALL.to_vec(),
        dates: indexed.keys().copied().collect(),
        rows: indexed.values().map(|s| row(Some(s))).collect(),
    }
}

/// One row for every calendar day in `span`, including days with no sample.
pub fn tabulate_range(samples: &[ClimateSample], span: DateSpan) -> SampleTable {
    let indexed = by_date(samples);
    let dates: Vec<NaiveDate> = span.days().collect();
    SampleTable {
        columns: Parameter::ALL.to_vec(),
        rows: dates.iter().map(|d| row(indexed.get(d))).collect(),
        dates,
    }
}

/// `weather_data_{lat}_{lon}_{start}_to_{end}.{ext}`
pub fn file_name(coordinate: Coordinate, span: DateSpan, format: ExportFormat) -> String {
    format!(
        "weather_data_{}_{}_{}_to_{}.{}",
        coordinate.latitude(),
        coordinate.longitude(),
        span.start,
        span.end,
        format.extension()
    )
}
