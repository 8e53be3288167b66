//! Defines the closed set of daily climate parameters the engine understands,
//! keyed by their NASA POWER codes.

use crate::validation::InvalidInput;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A daily climate parameter as published by the NASA POWER daily point API.
///
/// The set is fixed; every [`crate::ClimateSample`] maps a subset of these to values.
///
/// # Examples
///
/// ```
/// use climate_odds::Parameter;
///
/// assert_eq!(Parameter::TemperatureMax.code(), "T2M_MAX");
/// assert_eq!("rh2m".parse::<Parameter>().unwrap(), Parameter::RelativeHumidity);
/// assert_eq!(Parameter::Precipitation.to_string(), "PRECTOTCORR");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Parameter {
    /// Daily mean temperature at 2 m (°C).
    #[serde(rename = "T2M")]
    TemperatureMean,
    /// Daily maximum temperature at 2 m (°C).
    #[serde(rename = "T2M_MAX")]
    TemperatureMax,
    /// Daily minimum temperature at 2 m (°C).
    #[serde(rename = "T2M_MIN")]
    TemperatureMin,
    /// Bias-corrected precipitation (mm/day).
    #[serde(rename = "PRECTOTCORR")]
    Precipitation,
    /// Relative humidity at 2 m (%).
    #[serde(rename = "RH2M")]
    RelativeHumidity,
    /// Wind speed at 2 m (m/s).
    #[serde(rename = "WS2M")]
    WindSpeed,
    /// Surface pressure (kPa).
    #[serde(rename = "PS")]
    SurfacePressure,
    /// All-sky surface shortwave downward irradiance (MJ/m²/day).
    #[serde(rename = "ALLSKY_SFC_SW_DWN")]
    SolarRadiation,
}

impl Parameter {
    /// Every parameter, in export column order.
    pub const ALL: [Parameter; 8] = [
        Parameter::TemperatureMean,
        Parameter::TemperatureMax,
        Parameter::TemperatureMin,
        Parameter::Precipitation,
        Parameter::RelativeHumidity,
        Parameter::WindSpeed,
        Parameter::SurfacePressure,
        Parameter::SolarRadiation,
    ];

    /// The upstream parameter code, also used as column name and serialized tag.
    pub fn code(&self) -> &'static str {
        match self {
            Parameter::TemperatureMean => "T2M",
            Parameter::TemperatureMax => "T2M_MAX",
            Parameter::TemperatureMin => "T2M_MIN",
            Parameter::Precipitation => "PRECTOTCORR",
            Parameter::RelativeHumidity => "RH2M",
            Parameter::WindSpeed => "WS2M",
            Parameter::SurfacePressure => "PS",
            Parameter::SolarRadiation => "ALLSKY_SFC_SW_DWN",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Parameter::TemperatureMean => "Temperature at 2 Meters",
            Parameter::TemperatureMax => "Maximum Temperature at 2 Meters",
            Parameter::TemperatureMin => "Minimum Temperature at 2 Meters",
            Parameter::Precipitation => "Precipitation Corrected",
            Parameter::RelativeHumidity => "Relative Humidity at 2 Meters",
            Parameter::WindSpeed => "Wind Speed at 2 Meters",
            Parameter::SurfacePressure => "Surface Pressure",
            Parameter::SolarRadiation => "Solar Radiation",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Parameter::TemperatureMean
            | Parameter::TemperatureMax
            | Parameter::TemperatureMin => "°C",
            Parameter::Precipitation => "mm/day",
            Parameter::RelativeHumidity => "%",
            Parameter::WindSpeed => "m/s",
            Parameter::SurfacePressure => "kPa",
            Parameter::SolarRadiation => "MJ/m²/day",
        }
    }

    /// Human-readable label with unit, e.g. `"Surface Pressure (kPa)"`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.description(), self.unit())
    }

    pub(crate) fn from_code(code: &str) -> Option<Parameter> {
        Parameter::ALL
            .into_iter()
            .find(|p| p.code().eq_ignore_ascii_case(code))
    }
}

impl FromStr for Parameter {
    type Err = InvalidInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parameter::from_code(s.trim()).ok_or_else(|| InvalidInput::UnknownParameter(s.to_string()))
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
