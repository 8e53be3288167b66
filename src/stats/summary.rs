//! Windowed summary statistics: reduces a sample collection to per-parameter
//! descriptive statistics for a target day of year.

use crate::stats::window::SampleWindow;
use crate::types::parameter::Parameter;
use crate::types::sample::ClimateSample;
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::collections::BTreeMap;

/// Descriptive statistics over one parameter's windowed values.
///
/// Standard deviation is the population form (divide by N). Percentiles use
/// linear interpolation between order statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub percentile_25: f64,
    pub percentile_75: f64,
    pub percentile_90: f64,
    pub percentile_95: f64,
}

/// Summary for one parameter. `stats` is `None` when the window held no value
/// for the parameter; in that case `sample_count` is 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsSummary {
    pub sample_count: usize,
    #[serde(flatten)]
    pub stats: Option<SummaryStats>,
}

impl StatisticsSummary {
    /// The explicit no-data marker.
    pub fn no_data() -> Self {
        Self {
            sample_count: 0,
            stats: None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        self.stats.is_none()
    }

    pub fn mean(&self) -> Option<f64> {
        self.stats.as_ref().map(|s| s.mean)
    }

    /// Computes the summary of an arbitrary slice of values.
    pub fn from_values(values: &[f64]) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return Self::no_data();
        }
        sorted.sort_unstable_by_key(|v| OrderedFloat(*v));

        let n = sorted.len() as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Self {
            sample_count: sorted.len(),
            stats: Some(SummaryStats {
                mean,
                median: percentile(&sorted, 0.5),
                std: variance.sqrt(),
                min: sorted[0],
                max: sorted[sorted.len() - 1],
                percentile_25: percentile(&sorted, 0.25),
                percentile_75: percentile(&sorted, 0.75),
                percentile_90: percentile(&sorted, 0.90),
                percentile_95: percentile(&sorted, 0.95),
            }),
        }
    }
}

/// Linear interpolation between order statistics (`q` in [0, 1]) over sorted,
/// non-empty values.
pub(crate) fn percentile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Summarises each requested parameter over the `±window_days` window around
/// `target_day_of_year`. A sample missing a parameter only drops out of that
/// parameter's summary.
pub fn summarize(
    samples: &[ClimateSample],
    target_day_of_year: u32,
    window_days: u32,
    parameters: &[Parameter],
) -> BTreeMap<Parameter, StatisticsSummary> {
    let window = SampleWindow::new(samples, target_day_of_year, window_days);
    parameters
        .iter()
        .map(|&parameter| {
            (
                parameter,
                StatisticsSummary::from_values(&window.values(parameter)),
            )
        })
        .collect()
}
