//! Engine-wide settings, fixed when a [`crate::ClimateOdds`] is built.

use crate::prediction::rules::ThresholdConfig;
use crate::utils::default_scorer_path;
use crate::validation::{self, InvalidInput};
use bon::bon;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_POWER_URL: &str = "https://power.larc.nasa.gov/api/temporal/daily/point";
pub const DEFAULT_COMMUNITY: &str = "RE";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 32 * 1024 * 1024;
pub const DEFAULT_YEARS_BACK: u32 = 10;
pub const DEFAULT_WINDOW_DAYS: u32 = 7;
pub const DEFAULT_TIMESERIES_YEARS: u32 = 5;
pub const DEFAULT_WET_DAY_THRESHOLD_MM: f64 = 1.0;
pub const DEFAULT_HISTORY_RAIN_WEIGHT: f64 = 0.7;

/// Configuration of a [`crate::ClimateOdds`] engine.
///
/// # Examples
///
/// ```
/// use climate_odds::EngineConfig;
/// use std::time::Duration;
///
/// let config = EngineConfig::builder()
///     .timeout(Duration::from_secs(10))
///     .years_back(5)
///     .build();
/// assert_eq!(config.window_days, 7);
/// assert_eq!(config.community, "RE");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// NASA POWER daily point endpoint.
    pub power_url: String,
    pub community: String,
    /// Upper bound on every upstream call.
    pub timeout: Duration,
    pub max_payload_bytes: usize,
    /// Complete years of history behind each statistic.
    pub years_back: u32,
    /// Half-width of the day-of-year window.
    pub window_days: u32,
    /// Default span of a time series, in years.
    pub timeseries_years: u32,
    /// Daily precipitation (mm) at which a day counts as wet.
    pub wet_day_threshold_mm: f64,
    /// Weight of the historical wet-day frequency in the rain probability;
    /// the seasonal factor gets the remainder.
    pub history_rain_weight: f64,
    /// Session default advisory thresholds.
    pub thresholds: ThresholdConfig,
    /// Scorer artifact to load. `None` disables the scorer.
    pub scorer_path: Option<PathBuf>,
    /// Fixed "today". `None` means the current UTC date.
    pub reference_date: Option<NaiveDate>,
}

#[bon]
impl EngineConfig {
    #[builder]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        #[builder(into)] power_url: Option<String>,
        #[builder(into)] community: Option<String>,
        timeout: Option<Duration>,
        max_payload_bytes: Option<usize>,
        years_back: Option<u32>,
        window_days: Option<u32>,
        timeseries_years: Option<u32>,
        wet_day_threshold_mm: Option<f64>,
        history_rain_weight: Option<f64>,
        thresholds: Option<ThresholdConfig>,
        scorer_path: Option<PathBuf>,
        // true skips the default artifact path.
        #[builder(default)]
        without_scorer: bool,
        reference_date: Option<NaiveDate>,
    ) -> Self {
        let scorer_path = if without_scorer {
            None
        } else {
            scorer_path.or_else(default_scorer_path)
        };
        Self {
            power_url: power_url.unwrap_or_else(|| DEFAULT_POWER_URL.to_string()),
            community: community.unwrap_or_else(|| DEFAULT_COMMUNITY.to_string()),
            timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
            max_payload_bytes: max_payload_bytes.unwrap_or(DEFAULT_MAX_PAYLOAD_BYTES),
            years_back: years_back.unwrap_or(DEFAULT_YEARS_BACK),
            window_days: window_days.unwrap_or(DEFAULT_WINDOW_DAYS),
            timeseries_years: timeseries_years.unwrap_or(DEFAULT_TIMESERIES_YEARS),
            wet_day_threshold_mm: wet_day_threshold_mm.unwrap_or(DEFAULT_WET_DAY_THRESHOLD_MM),
            history_rain_weight: history_rain_weight.unwrap_or(DEFAULT_HISTORY_RAIN_WEIGHT),
            thresholds: thresholds.unwrap_or_default(),
            scorer_path,
            reference_date,
        }
    }

    /// Rejects settings no request could be served with.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        validation::years(self.years_back)?;
        validation::years(self.timeseries_years)?;
        validation::window_days(self.window_days)?;
        validation::rain_weight(self.history_rain_weight)?;
        if !self.wet_day_threshold_mm.is_finite() {
            return Err(InvalidInput::NonFiniteThreshold(
                "wet_day_threshold_mm".to_string(),
            ));
        }
        self.thresholds.validate()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
