//! One day of climate observations for a single coordinate.

use crate::types::parameter::Parameter;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// The values observed (or synthesized) for one calendar day.
///
/// A parameter absent from `values` is a missing observation for that day;
/// it is not the same as zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateSample {
    pub date: NaiveDate,
    pub values: BTreeMap<Parameter, f64>,
}

impl ClimateSample {
    pub fn new(date: NaiveDate, values: BTreeMap<Parameter, f64>) -> Self {
        Self { date, values }
    }

    pub fn get(&self, parameter: Parameter) -> Option<f64> {
        self.values.get(&parameter).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<const N: usize> From<(NaiveDate, [(Parameter, f64); N])> for ClimateSample {
    fn from((date, values): (NaiveDate, [(Parameter, f64); N])) -> Self {
        Self {
            date,
            values: values.into_iter().collect(),
        }
    }
}
