//! The main entry point: an engine that owns the sample provider, the
//! seasonal fallback, the optional air-quality scorer and the configuration,
//! and hands out one client builder per operation.

use crate::clients::current_client::CurrentClient;
use crate::clients::export_client::ExportClient;
use crate::clients::prediction_client::PredictionClient;
use crate::clients::probability_client::ProbabilityClient;
use crate::clients::series_client::SeriesClient;
use crate::clients::statistics_client::StatisticsClient;
use crate::config::EngineConfig;
use crate::error::ClimateError;
use crate::prediction::scorer::{LinearScorer, Scorer};
use crate::provider::error::ProviderError;
use crate::provider::power_client::PowerClient;
use crate::provider::sample_provider::SampleProvider;
use crate::provider::synthetic::SeasonalSynthesizer;
use crate::stats::window::history_range;
use crate::types::coordinate::Coordinate;
use crate::types::data_source::DataSource;
use crate::types::parameter::Parameter;
use crate::types::sample::ClimateSample;
use chrono::{Datelike, NaiveDate, Utc};
use log::{info, warn};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Samples plus a tag saying whether they are real history or synthetic.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LoadedSamples {
    pub samples: Vec<ClimateSample>,
    pub data_source: DataSource,
}

/// A point-in-time health snapshot. Built without any I/O.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineStatus {
    pub scorer_loaded: bool,
    pub upstream: String,
    pub reference_date: NaiveDate,
}

/// Estimates weather odds for any coordinate and calendar day.
///
/// Every operation is a builder: pick the operation, start it with
/// `.at(coordinate)`, set optional arguments, then `.call().await`.
///
/// Requests share no mutable state, so one engine can serve any number of
/// concurrent requests (wrap it in an `Arc` to share across tasks).
///
/// # Examples
///
/// ```no_run
/// use climate_odds::{ClimateOdds, Coordinate, parse_date};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = ClimateOdds::new().await?;
/// let delhi = Coordinate::new(28.61, 77.21)?;
///
/// let prediction = engine
///     .prediction()
///     .at(delhi)
///     .date(parse_date("2025-08-20")?)
///     .call()
///     .await?;
/// println!("{}% chance of rain ({})", prediction.rain_probability, prediction.data_source);
/// # Ok(())
/// # }
/// ```
pub struct ClimateOdds {
    provider: Arc<dyn SampleProvider>,
    synthesizer: SeasonalSynthesizer,
    scorer: Option<Arc<dyn Scorer>>,
    config: EngineConfig,
}

impl ClimateOdds {
    /// Creates an engine backed by NASA POWER with the default configuration.
    ///
    /// The scorer is loaded from the default artifact path; if that fails the
    /// engine still starts and predictions omit the air-quality fields.
    pub async fn new() -> Result<Self, ClimateError> {
        Self::with_config(EngineConfig::default()).await
    }

    /// Creates an engine backed by NASA POWER.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::InvalidInput`] for an unusable configuration and
    /// [`ClimateError::Provider`] if the HTTP client cannot be built.
    pub async fn with_config(config: EngineConfig) -> Result<Self, ClimateError> {
        config.validate()?;
        let provider = Arc::new(PowerClient::new(&config)?);
        let scorer = load_scorer(config.scorer_path.as_deref()).await;
        Self::with_parts(provider, scorer, config)
    }

    /// Assembles an engine from an arbitrary provider and scorer.
    pub fn with_parts(
        provider: Arc<dyn SampleProvider>,
        scorer: Option<Arc<dyn Scorer>>,
        config: EngineConfig,
    ) -> Result<Self, ClimateError> {
        config.validate()?;
        Ok(Self {
            provider,
            synthesizer: SeasonalSynthesizer,
            scorer,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            scorer_loaded: self.scorer.is_some(),
            upstream: self.provider.describe(),
            reference_date: self.today(),
        }
    }

    /// Point prediction with derived indices and advice.
    pub fn prediction(&self) -> PredictionClient<'_> {
        PredictionClient::new(self)
    }

    /// Summary statistics around a day of year.
    pub fn statistics(&self) -> StatisticsClient<'_> {
        StatisticsClient::new(self)
    }

    /// Threshold exceedance probabilities around a day of year.
    pub fn probability(&self) -> ProbabilityClient<'_> {
        ProbabilityClient::new(self)
    }

    /// Daily values of one parameter over recent years.
    pub fn timeseries(&self) -> SeriesClient<'_> {
        SeriesClient::new(self)
    }

    /// Bulk CSV/JSON export of a date range.
    pub fn export(&self) -> ExportClient<'_> {
        ExportClient::new(self)
    }

    /// The most recent observed day.
    pub fn current(&self) -> CurrentClient<'_> {
        CurrentClient::new(self)
    }

    pub(crate) fn today(&self) -> NaiveDate {
        self.config
            .reference_date
            .unwrap_or_else(|| Utc::now().date_naive())
    }

    pub(crate) fn synthesizer(&self) -> &SeasonalSynthesizer {
        &self.synthesizer
    }

    pub(crate) fn scorer(&self) -> Option<&dyn Scorer> {
        self.scorer.as_deref()
    }

    /// Fetches `years_back` complete years of windows around `target_day`,
    /// ending the year before `anchor_year` (or before the current year,
    /// whichever is earlier). Never returns a partial or empty collection.
    pub(crate) async fn fetch_history(
        &self,
        coordinate: Coordinate,
        target_day: u32,
        window_days: u32,
        years_back: u32,
        anchor_year: i32,
        parameters: &[Parameter],
    ) -> Result<Vec<ClimateSample>, ProviderError> {
        let today = self.today();
        let last_year = anchor_year.min(today.year()) - 1;
        let (start, end) = history_range(target_day, window_days, years_back, last_year)
            .ok_or_else(|| ProviderError::Unavailable(format!("no history range for year {last_year}")))?;
        let samples = self
            .provider
            .fetch(coordinate, start, end.min(today), parameters)
            .await?;
        if samples.is_empty() {
            return Err(ProviderError::Unavailable(format!(
                "no samples between {start} and {end}"
            )));
        }
        Ok(samples)
    }

    /// Like [`Self::fetch_history`], substituting synthetic seasonal samples
    /// over the same range when history is unavailable.
    pub(crate) async fn load_history(
        &self,
        coordinate: Coordinate,
        target_day: u32,
        window_days: u32,
        years_back: u32,
        parameters: &[Parameter],
    ) -> LoadedSamples {
        let today = self.today();
        match self
            .fetch_history(coordinate, target_day, window_days, years_back, today.year(), parameters)
            .await
        {
            Ok(samples) => LoadedSamples {
                samples,
                data_source: DataSource::Historical,
            },
            Err(e) => {
                warn!("Historical data unavailable for {}, using seasonal fallback: {}", coordinate, e);
                let last_year = today.year() - 1;
                let samples = history_range(target_day, window_days, years_back, last_year)
                    .map(|(start, end)| self.synthesizer.samples(coordinate, start, end, parameters))
                    .unwrap_or_default();
                LoadedSamples {
                    samples,
                    data_source: DataSource::SeasonalFallback,
                }
            }
        }
    }

    /// Samples for an explicit inclusive date range, with the same fallback.
    pub(crate) async fn load_range(
        &self,
        coordinate: Coordinate,
        start: NaiveDate,
        end: NaiveDate,
        parameters: &[Parameter],
    ) -> LoadedSamples {
        let fetched = self.provider.fetch(coordinate, start, end, parameters).await;
        match fetched {
            Ok(samples) if !samples.is_empty() => LoadedSamples {
                samples,
                data_source: DataSource::Historical,
            },
            Ok(_) => {
                warn!("No samples for {} between {} and {}, using seasonal fallback", coordinate, start, end);
                self.synthetic(coordinate, start, end, parameters)
            }
            Err(e) => {
                warn!("Historical data unavailable for {}, using seasonal fallback: {}", coordinate, e);
                self.synthetic(coordinate, start, end, parameters)
            }
        }
    }

    fn synthetic(
        &self,
        coordinate: Coordinate,
        start: NaiveDate,
        end: NaiveDate,
        parameters: &[Parameter],
    ) -> LoadedSamples {
        LoadedSamples {
            samples: self.synthesizer.samples(coordinate, start, end, parameters),
            data_source: DataSource::SeasonalFallback,
        }
    }
}

/// Loads the scorer once. Failure is logged here and only here.
async fn load_scorer(path: Option<&Path>) -> Option<Arc<dyn Scorer>> {
    let Some(path) = path else {
        info!("No scorer configured, air-quality fields will be omitted");
        return None;
    };
    match LinearScorer::load(path).await {
        Ok(scorer) => Some(Arc::new(scorer)),
        Err(e) => {
            warn!(
                "Air-quality scorer unavailable at {}, air-quality fields will be omitted: {}",
                path.display(),
                e
            );
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Always fails, like an unreachable upstream.
    #[derive(Debug, Default)]
    pub(crate) struct OfflineProvider {
        pub calls: AtomicUsize,
    }

    #[async_trait]
    impl SampleProvider for OfflineProvider {
        async fn fetch(
            &self,
            _coordinate: Coordinate,
            _start: NaiveDate,
            _end: NaiveDate,
            _parameters: &[Parameter],
        ) -> Result<Vec<ClimateSample>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ProviderError::Unavailable("offline".to_string()))
        }
    }

    /// Serves a fixed daily value for every parameter and records requested ranges.
    #[derive(Debug, Default)]
    pub(crate) struct ConstantProvider {
        pub value: f64,
        pub ranges: Mutex<Vec<(NaiveDate, NaiveDate)>>,
    }

    impl ConstantProvider {
        pub(crate) fn new(value: f64) -> Self {
            Self {
                value,
                ranges: Mutex::default(),
            }
        }
    }

    #[async_trait]
    impl SampleProvider for ConstantProvider {
        async fn fetch(
            &self,
            _coordinate: Coordinate,
            start: NaiveDate,
            end: NaiveDate,
            parameters: &[Parameter],
        ) -> Result<Vec<ClimateSample>, ProviderError> {
            if let Ok(mut ranges) = self.ranges.lock() {
                ranges.push((start, end));
            }
            Ok(start
                .iter_days()
                .take_while(|d| *d <= end)
                .map(|date| {
                    ClimateSample::new(date, parameters.iter().map(|p| (*p, self.value)).collect())
                })
                .collect())
        }

        fn describe(&self) -> String {
            "constant".to_string()
        }
    }

    pub(crate) fn reference_config() -> EngineConfig {
        EngineConfig::builder()
            .without_scorer(true)
            .reference_date(NaiveDate::from_ymd_opt(2025, 10, 1).unwrap())
            .build()
    }

    pub(crate) fn delhi() -> Coordinate {
        Coordinate::new(28.61, 77.21).unwrap()
    }

    #[test]
    fn test_status_reports_scorer_and_upstream() -> Result<(), ClimateError> {
        let engine = ClimateOdds::with_parts(
            Arc::new(ConstantProvider::new(1.0)),
            None,
            reference_config(),
        )?;
        let status = engine.status();
        assert!(!status.scorer_loaded);
        assert_eq!(status.upstream, "constant");
        assert_eq!(status.reference_date, NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_scorer_artifact_is_not_fatal() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let config = EngineConfig::builder()
            .scorer_path(dir.path().join("missing.bin"))
            .power_url("http://127.0.0.1:1/unused")
            .build();
        let engine = ClimateOdds::with_config(config).await?;
        assert!(!engine.status().scorer_loaded);
        Ok(())
    }

    #[tokio::test]
    async fn test_scorer_loaded_from_artifact() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("aqi_scorer.bin");
        LinearScorer::new([0.0; 4], [1.0; 4], [0.0; 4], 42.0)?
            .save(&path)
            .await?;
        let config = EngineConfig::builder()
            .scorer_path(path)
            .power_url("http://127.0.0.1:1/unused")
            .build();
        let engine = ClimateOdds::with_config(config).await?;
        assert!(engine.status().scorer_loaded);
        Ok(())
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig::builder().years_back(0).without_scorer(true).build();
        let result = ClimateOdds::with_parts(Arc::new(OfflineProvider::default()), None, config);
        assert!(matches!(result, Err(ClimateError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_history_range_requested_from_provider() -> Result<(), ClimateError> {
        let provider = Arc::new(ConstantProvider::new(20.0));
        let engine = ClimateOdds::with_parts(provider.clone(), None, reference_config())?;
        let samples = engine
            .fetch_history(delhi(), 185, 7, 10, 2025, &[Parameter::TemperatureMean])
            .await?;
        let ranges = provider.ranges.lock().map(|r| r.clone()).unwrap_or_default();
        assert_eq!(
            ranges,
            vec![(
                NaiveDate::from_ymd_opt(2015, 6, 27).unwrap(),
                NaiveDate::from_ymd_opt(2024, 7, 11).unwrap()
            )]
        );
        assert_eq!(samples.first().map(|s| s.date), Some(ranges[0].0));
        Ok(())
    }

    #[tokio::test]
    async fn test_load_range_falls_back_when_offline() -> Result<(), ClimateError> {
        let provider = Arc::new(OfflineProvider::default());
        let engine = ClimateOdds::with_parts(provider.clone(), None, reference_config())?;
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let loaded = engine
            .load_range(delhi(), start, end, &Parameter::ALL)
            .await;
        assert_eq!(loaded.data_source, DataSource::SeasonalFallback);
        assert_eq!(loaded.samples.len(), 10);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        Ok(())
    }
}
