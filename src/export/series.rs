use crate::types::parameter::Parameter;
use crate::types::sample::ClimateSample;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// An ordered `(date, value)` view of one parameter, for charting.
///
/// Borrowing and `Copy`, so it can be iterated any number of times.
#[derive(Debug, Clone, Copy)]
pub struct TimeSeries<'a> {
    samples: &'a [ClimateSample],
    parameter: Parameter,
}

impl<'a> TimeSeries<'a> {
    /// Points in sample order, skipping days without a value.
    pub fn iter(&self) -> impl Iterator<Item = SeriesPoint> + 'a {
        let parameter = self.parameter;
        self.samples.iter().filter_map(move |s| {
            s.get(parameter)
                .filter(|v| v.is_finite())
                .map(|value| SeriesPoint {
                    date: s.date,
                    value,
                })
        })
    }

    pub fn to_points(&self) -> Vec<SeriesPoint> {
        self.iter().collect()
    }
}

/// Projects chronologically ordered samples onto one parameter.
pub fn series(samples: &[ClimateSample], parameter: Parameter) -> TimeSeries<'_> {
    TimeSeries { samples, parameter }
}
