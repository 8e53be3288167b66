//! Tags telling the caller where the numbers in a response came from.

use serde::Serialize;
use std::fmt;

/// Which statistics source produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataSource {
    /// Computed from upstream historical daily records.
    #[serde(rename = "historical")]
    Historical,
    /// Upstream data was unavailable; computed from the seasonal reference model.
    #[serde(rename = "seasonal-fallback")]
    SeasonalFallback,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Historical => "historical",
            DataSource::SeasonalFallback => "seasonal-fallback",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
