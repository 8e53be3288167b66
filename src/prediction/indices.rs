//! Closed-form derived indices.

use serde::Serialize;
use std::fmt;

/// Heat index applies at or above this maximum temperature (°C).
pub const HEAT_INDEX_MIN_TEMPERATURE: f64 = 27.0;
/// Heat index applies at or above this relative humidity (%).
pub const HEAT_INDEX_MIN_HUMIDITY: f64 = 40.0;
/// Wind chill applies at or below this minimum temperature (°C).
pub const WIND_CHILL_MAX_TEMPERATURE: f64 = 10.0;
/// Wind chill applies at or above this wind speed (km/h).
pub const WIND_CHILL_MIN_WIND_KMH: f64 = 4.8;

const MS_TO_KMH: f64 = 3.6;

/// Apparent temperature from the Rothfusz regression (Celsius form).
///
/// Below 27 °C or 40 % humidity the regression is not valid and the
/// temperature itself is returned. The result is never below the air
/// temperature.
///
/// ```
/// use climate_odds::heat_index;
///
/// assert!((heat_index(35.0, 60.0) - 45.1).abs() < 0.1);
/// assert_eq!(heat_index(25.0, 90.0), 25.0);
/// assert_eq!(heat_index(30.0, 40.0), 30.0);
/// ```
pub fn heat_index(temperature_max: f64, humidity: f64) -> f64 {
    if temperature_max < HEAT_INDEX_MIN_TEMPERATURE || humidity < HEAT_INDEX_MIN_HUMIDITY {
        return temperature_max;
    }
    let t = temperature_max;
    let r = humidity;
    let hi = -8.784_694_755_56 + 1.611_394_11 * t + 2.338_548_838_89 * r
        - 0.146_116_05 * t * r
        - 0.012_308_094 * t * t
        - 0.016_424_827_777_8 * r * r
        + 0.002_211_732 * t * t * r
        + 0.000_725_46 * t * r * r
        - 0.000_003_582 * t * t * r * r;
    hi.max(temperature_max)
}

/// Wind chill (Environment Canada), with wind speed given in m/s.
///
/// Only defined for cold, moving air; otherwise the temperature is returned.
pub fn wind_chill(temperature_min: f64, wind_speed_ms: f64) -> f64 {
    let v = wind_speed_ms * MS_TO_KMH;
    if temperature_min > WIND_CHILL_MAX_TEMPERATURE || v < WIND_CHILL_MIN_WIND_KMH {
        return temperature_min;
    }
    let t = temperature_min;
    let v16 = v.powf(0.16);
    13.12 + 0.6215 * t - 11.37 * v16 + 0.3965 * t * v16
}

/// The six standard air-quality bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AqiCategory {
    Good,
    Moderate,
    #[serde(rename = "Unhealthy for Sensitive Groups")]
    UnhealthyForSensitiveGroups,
    Unhealthy,
    #[serde(rename = "Very Unhealthy")]
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    pub fn from_index(aqi: u16) -> Self {
        match aqi {
            0..=50 => AqiCategory::Good,
            51..=100 => AqiCategory::Moderate,
            101..=150 => AqiCategory::UnhealthyForSensitiveGroups,
            151..=200 => AqiCategory::Unhealthy,
            201..=300 => AqiCategory::VeryUnhealthy,
            _ => AqiCategory::Hazardous,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Clamps a raw scorer output to the 0-500 index scale.
pub(crate) fn clamp_aqi(raw: f64) -> Option<u16> {
    if raw.is_finite() {
        Some(raw.clamp(0.0, 500.0).round() as u16)
    } else {
        None
    }
}
