//! Threshold-exceedance probability over the same day-of-year window used by
//! the aggregator.

use crate::stats::window::SampleWindow;
use crate::types::parameter::Parameter;
use crate::types::sample::ClimateSample;
use crate::utils::round1;
use crate::validation::InvalidInput;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the threshold counts as a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdDirection {
    /// value >= threshold (heat, rain, wind)
    AtLeast,
    /// value <= threshold (cold)
    AtMost,
}

impl ThresholdDirection {
    pub fn matches(&self, value: f64, threshold: f64) -> bool {
        match self {
            ThresholdDirection::AtLeast => value >= threshold,
            ThresholdDirection::AtMost => value <= threshold,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ThresholdDirection::AtLeast => "≥",
            ThresholdDirection::AtMost => "≤",
        }
    }
}

impl fmt::Display for ThresholdDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A caller's question about one parameter: how often is it at least / at most `threshold`?
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdQuery {
    pub parameter: Parameter,
    pub threshold: f64,
    pub direction: ThresholdDirection,
}

impl ThresholdQuery {
    pub fn at_least(parameter: Parameter, threshold: f64) -> Self {
        Self {
            parameter,
            threshold,
            direction: ThresholdDirection::AtLeast,
        }
    }

    pub fn at_most(parameter: Parameter, threshold: f64) -> Self {
        Self {
            parameter,
            threshold,
            direction: ThresholdDirection::AtMost,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), InvalidInput> {
        if self.threshold.is_finite() {
            Ok(())
        } else {
            Err(InvalidInput::NonFiniteThreshold(self.parameter.to_string()))
        }
    }
}

/// Outcome of a threshold query.
///
/// `probability` is a percentage rounded to one decimal, or `None` when the
/// window held no value for the parameter (unavailable, which is not 0%).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdResult {
    pub parameter: Parameter,
    pub threshold: f64,
    pub direction: ThresholdDirection,
    pub probability: Option<f64>,
    pub sample_count: usize,
    pub exceed_count: usize,
}

impl ThresholdResult {
    pub fn is_available(&self) -> bool {
        self.probability.is_some()
    }
}

/// Estimates how often `parameter` satisfied the threshold within the window.
pub fn probability(
    samples: &[ClimateSample],
    target_day_of_year: u32,
    window_days: u32,
    query: ThresholdQuery,
) -> ThresholdResult {
    let window = SampleWindow::new(samples, target_day_of_year, window_days);
    let values = window.values(query.parameter);
    let exceed_count = values
        .iter()
        .filter(|v| query.direction.matches(**v, query.threshold))
        .count();
    ThresholdResult {
        parameter: query.parameter,
        threshold: query.threshold,
        direction: query.direction,
        probability: percentage(exceed_count, values.len()),
        sample_count: values.len(),
        exceed_count,
    }
}

pub(crate) fn percentage(hits: usize, total: usize) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(round1(hits as f64 / total as f64 * 100.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::window::{date_for_cycle_day, normalized_day_of_year};
    use chrono::{Duration, NaiveDate};

    /// Ten years of 15-day windows around day 185; `hot` of the 150 days reach 35°C.
    fn window_samples(hot: usize) -> Vec<ClimateSample> {
        let mut samples = Vec::new();
        let mut index = 0;
        for year in 2014..2024 {
            let center = date_for_cycle_day(year, 185).unwrap();
            for offset in -7..=7 {
                let value = if index < hot { 35.0 } else { 28.0 };
                samples.push(ClimateSample::from((
                    center + Duration::days(offset),
                    [(Parameter::TemperatureMax, value)],
                )));
                index += 1;
            }
        }
        samples
    }

    #[test]
    fn test_reference_example_98_of_150() {
        let samples = window_samples(98);
        let result = probability(
            &samples,
            185,
            7,
            ThresholdQuery::at_least(Parameter::TemperatureMax, 32.0),
        );
        assert_eq!(result.sample_count, 150);
        assert_eq!(result.exceed_count, 98);
        assert_eq!(result.probability, Some(65.3));
    }

    #[test]
    fn test_zero_samples_is_unavailable_not_zero() {
        let result = probability(
            &[],
            185,
            7,
            ThresholdQuery::at_least(Parameter::Precipitation, 1.0),
        );
        assert_eq!(result.probability, None);
        assert!(!result.is_available());
        assert_eq!(result.sample_count, 0);
    }

    #[test]
    fn test_comparisons_are_inclusive() {
        let day = NaiveDate::from_ymd_opt(2020, 1, 10).unwrap();
        let samples = vec![ClimateSample::from((day, [(Parameter::TemperatureMin, 5.0)]))];
        let doy = normalized_day_of_year(day);
        let at_most = probability(
            &samples,
            doy,
            1,
            ThresholdQuery::at_most(Parameter::TemperatureMin, 5.0),
        );
        let at_least = probability(
            &samples,
            doy,
            1,
            ThresholdQuery::at_least(Parameter::TemperatureMin, 5.0),
        );
        assert_eq!(at_most.probability, Some(100.0));
        assert_eq!(at_least.probability, Some(100.0));
    }

    #[test]
    fn test_at_least_is_monotonic_in_threshold() {
        let samples = window_samples(98);
        let mut previous = f64::INFINITY;
        for step in 0..40 {
            let threshold = 20.0 + step as f64 * 0.5;
            let result = probability(
                &samples,
                185,
                7,
                ThresholdQuery::at_least(Parameter::TemperatureMax, threshold),
            );
            let p = result.probability.unwrap();
            assert!(p <= previous, "probability rose at threshold {threshold}");
            previous = p;
        }
    }

    #[test]
    fn test_sample_count_agrees_with_summary() {
        let mut samples = window_samples(98);
        let center = date_for_cycle_day(2020, 185).unwrap();
        samples.push(ClimateSample::from((center, [(Parameter::TemperatureMax, f64::NAN)])));
        samples.push(ClimateSample::from((center, [(Parameter::TemperatureMax, f64::INFINITY)])));

        let result = probability(
            &samples,
            185,
            7,
            ThresholdQuery::at_least(Parameter::TemperatureMax, 32.0),
        );
        let summaries = crate::stats::summary::summarize(&samples, 185, 7, &[Parameter::TemperatureMax]);
        assert_eq!(result.sample_count, 150);
        assert_eq!(result.sample_count, summaries[&Parameter::TemperatureMax].sample_count);
        assert_eq!(result.probability, Some(65.3));
    }

    #[test]
    fn test_direction_serde() -> Result<(), serde_json::Error> {
        let query: ThresholdQuery = serde_json::from_str(
            r#"{"parameter":"T2M_MIN","threshold":0.0,"direction":"at_most"}"#,
        )?;
        assert_eq!(query, ThresholdQuery::at_most(Parameter::TemperatureMin, 0.0));
        Ok(())
    }
}
