//! Boundary checks applied to every caller-supplied argument before any data is
//! fetched or computed. A request that fails here is rejected as a whole.

use chrono::NaiveDate;
use thiserror::Error;

/// Largest accepted `window_days`; a wider window would cover the whole year twice.
pub const MAX_WINDOW_DAYS: u32 = 182;
/// Largest accepted `years_back` / `years` value.
pub const MAX_YEARS: u32 = 40;
/// Largest accepted look-back for current conditions.
pub const MAX_LOOKBACK_DAYS: u32 = 31;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvalidInput {
    #[error("Latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("Longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("Malformed date '{0}', expected YYYY-MM-DD")]
    MalformedDate(String),

    #[error("Day of year {0} is outside 1..=366")]
    DayOfYearOutOfRange(u32),

    #[error("window_days must be between 1 and {max}, got {found}")]
    WindowDays { found: u32, max: u32 },

    #[error("Look-back must be between 1 and {max} days, got {found}")]
    LookbackDays { found: u32, max: u32 },

    #[error("Number of years must be between 1 and {max}, got {found}")]
    Years { found: u32, max: u32 },

    #[error("Start date {start} is after end date {end}")]
    ReversedDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Date range {start} to {end} spans more than {max_years} years")]
    DateRangeTooLong {
        start: NaiveDate,
        end: NaiveDate,
        max_years: u32,
    },

    #[error("Unsupported export format '{0}', expected 'csv' or 'json'")]
    UnsupportedFormat(String),

    #[error("Unknown parameter '{0}'")]
    UnknownParameter(String),

    #[error("Threshold for {0} must be a finite number")]
    NonFiniteThreshold(String),

    #[error("No thresholds provided")]
    EmptyThresholds,

    #[error("Period does not resolve to a valid date range")]
    InvalidPeriod,

    #[error("No parameters requested")]
    NoParameters,

    #[error("History rain weight {0} is outside [0, 1]")]
    RainWeight(f64),
}

pub(crate) fn day_of_year(day: u32) -> Result<u32, InvalidInput> {
    if (1..=366).contains(&day) {
        Ok(day)
    } else {
        Err(InvalidInput::DayOfYearOutOfRange(day))
    }
}

pub(crate) fn window_days(days: u32) -> Result<u32, InvalidInput> {
    if (1..=MAX_WINDOW_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(InvalidInput::WindowDays {
            found: days,
            max: MAX_WINDOW_DAYS,
        })
    }
}

pub(crate) fn lookback_days(days: u32) -> Result<u32, InvalidInput> {
    if (1..=MAX_LOOKBACK_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(InvalidInput::LookbackDays {
            found: days,
            max: MAX_LOOKBACK_DAYS,
        })
    }
}

pub(crate) fn years(years: u32) -> Result<u32, InvalidInput> {
    if (1..=MAX_YEARS).contains(&years) {
        Ok(years)
    } else {
        Err(InvalidInput::Years {
            found: years,
            max: MAX_YEARS,
        })
    }
}

pub(crate) fn date_range(start: NaiveDate, end: NaiveDate) -> Result<(), InvalidInput> {
    if start > end {
        return Err(InvalidInput::ReversedDateRange { start, end });
    }
    let span_days = (end - start).num_days();
    if span_days > i64::from(MAX_YEARS) * 366 {
        return Err(InvalidInput::DateRangeTooLong {
            start,
            end,
            max_years: MAX_YEARS,
        });
    }
    Ok(())
}

pub(crate) fn rain_weight(weight: f64) -> Result<f64, InvalidInput> {
    if (0.0..=1.0).contains(&weight) {
        Ok(weight)
    } else {
        Err(InvalidInput::RainWeight(weight))
    }
}

/// Parses a `YYYY-MM-DD` date string.
pub fn parse_date(input: &str) -> Result<NaiveDate, InvalidInput> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| InvalidInput::MalformedDate(input.to_string()))
}
