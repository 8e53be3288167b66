//! The seasonal reference model: a closed-form, data-free baseline used when
//! historical records are unavailable and blended into every prediction.
//!
//! The month-to-season table and the latitude adjustment describe one reference
//! climate (a South-Asian monsoon regime). They are a simplifying assumption
//! applied everywhere, not a global climatology.

use serde::Serialize;
use std::fmt;

/// A season of the reference climate, derived purely from the calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Season {
    /// March to May.
    Summer,
    /// June to October.
    Monsoon,
    /// November to February.
    Winter,
}

impl Season {
    /// Maps a calendar month (1-12) to its season. Months outside 1-12 fall into `Winter`.
    ///
    /// ```
    /// use climate_odds::Season;
    ///
    /// assert_eq!(Season::for_month(4), Season::Summer);
    /// assert_eq!(Season::for_month(8), Season::Monsoon);
    /// assert_eq!(Season::for_month(12), Season::Winter);
    /// ```
    pub fn for_month(month: u32) -> Season {
        match month {
            3..=5 => Season::Summer,
            6..=10 => Season::Monsoon,
            _ => Season::Winter,
        }
    }

    /// Stable numeric encoding used in scorer feature vectors.
    pub fn code(&self) -> f64 {
        match self {
            Season::Summer => 0.0,
            Season::Monsoon => 1.0,
            Season::Winter => 2.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Season::Summer => "Summer",
            Season::Monsoon => "Monsoon",
            Season::Winter => "Winter",
        }
    }

    /// The fixed baseline ranges for this season.
    pub fn baseline(&self) -> &'static SeasonBaseline {
        match self {
            Season::Summer => &SUMMER,
            Season::Monsoon => &MONSOON,
            Season::Winter => &WINTER,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Baseline values for one season, before the latitude correction.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonBaseline {
    /// Mean daily temperature range (°C).
    pub temperature: (f64, f64),
    /// Relative humidity range (%).
    pub humidity: (f64, f64),
    /// Base likelihood of a wet day, in [0, 1].
    pub rain_factor: f64,
    /// Typical 2 m wind speed (m/s).
    pub wind_speed: f64,
}

static SUMMER: SeasonBaseline = SeasonBaseline {
    temperature: (30.0, 43.0),
    humidity: (30.0, 50.0),
    rain_factor: 0.2,
    wind_speed: 3.5,
};

static MONSOON: SeasonBaseline = SeasonBaseline {
    temperature: (25.0, 30.0),
    humidity: (70.0, 95.0),
    rain_factor: 0.8,
    wind_speed: 4.5,
};

static WINTER: SeasonBaseline = SeasonBaseline {
    temperature: (18.0, 25.0),
    humidity: (40.0, 65.0),
    rain_factor: 0.3,
    wind_speed: 2.5,
};

/// Half the spread between the daily mean and the daily max/min (°C).
pub(crate) const DIURNAL_HALF_RANGE: f64 = 3.5;
/// Standard sea-level pressure (hPa).
pub(crate) const REFERENCE_PRESSURE_HPA: f64 = 1013.0;

/// Warm bias applied to the temperature baseline: positive towards the equator,
/// negative beyond 30° latitude.
pub fn latitude_adjustment(latitude: f64) -> f64 {
    (30.0 - latitude.abs()) / 10.0
}

/// Point estimates produced by the reference model for one month and latitude.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalEstimate {
    pub season: Season,
    pub temperature: f64,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    /// hPa
    pub pressure: f64,
    /// Rain likelihood scaled to [0, 100].
    pub rain_probability: f64,
}

/// Evaluates the reference model. Pure and infallible.
///
/// Values are taken at the midpoint of each seasonal range, so the same month
/// and latitude always produce the same estimate.
pub fn seasonal_estimate(month: u32, latitude: f64) -> SeasonalEstimate {
    let season = Season::for_month(month);
    let baseline = season.baseline();
    let temperature = midpoint(baseline.temperature) + latitude_adjustment(latitude);
    SeasonalEstimate {
        season,
        temperature,
        temperature_max: temperature + DIURNAL_HALF_RANGE,
        temperature_min: temperature - DIURNAL_HALF_RANGE,
        humidity: midpoint(baseline.humidity),
        wind_speed: baseline.wind_speed,
        pressure: REFERENCE_PRESSURE_HPA,
        rain_probability: (baseline.rain_factor * 100.0).clamp(0.0, 100.0),
    }
}

fn midpoint((low, high): (f64, f64)) -> f64 {
    (low + high) / 2.0
}
