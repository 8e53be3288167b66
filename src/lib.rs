mod climate_odds;
mod clients;
mod config;
mod error;
mod export;
mod prediction;
mod provider;
mod seasonal;
mod stats;
mod types;
mod utils;
mod validation;

pub use climate_odds::*;
pub use config::*;
pub use error::ClimateError;
pub use validation::{parse_date, InvalidInput, MAX_LOOKBACK_DAYS, MAX_WINDOW_DAYS, MAX_YEARS};

pub use clients::current_client::*;
pub use clients::export_client::*;
pub use clients::prediction_client::*;
pub use clients::probability_client::*;
pub use clients::series_client::*;
pub use clients::statistics_client::*;

pub use types::any_date::{AnyDate, DateSpan, Month, Year};
pub use types::coordinate::Coordinate;
pub use types::data_source::DataSource;
pub use types::parameter::Parameter;
pub use types::sample::ClimateSample;

pub use seasonal::{latitude_adjustment, seasonal_estimate, Season, SeasonBaseline, SeasonalEstimate};

pub use stats::summary::{summarize, StatisticsSummary, SummaryStats};
pub use stats::threshold::{probability, ThresholdDirection, ThresholdQuery, ThresholdResult};
pub use stats::window::{day_distance, normalized_day_of_year, SampleWindow};

pub use prediction::blender::{blend, HistoricalStatistics, PredictionResult};
pub use prediction::indices::{heat_index, wind_chill, AqiCategory};
pub use prediction::rules::{PrecautionGroup, ThresholdConfig};
pub use prediction::scorer::{
    AqiFeatures, LinearScorer, Scorer, ScorerArtifact, ScorerError, FEATURE_COUNT,
    SCORER_FORMAT_VERSION,
};

pub use export::series::{series, SeriesPoint, TimeSeries};
pub use export::table::{tabulate, tabulate_range, ExportError, ExportFile, ExportFormat, SampleTable};

pub use provider::error::ProviderError;
pub use provider::power_client::PowerClient;
pub use provider::sample_provider::SampleProvider;
pub use provider::synthetic::SeasonalSynthesizer;

pub use utils::default_scorer_path;
