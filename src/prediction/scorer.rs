//! The air-quality scorer: an opaque, read-only `features -> value` function
//! loaded once when the engine is built.

use crate::seasonal::Season;
use crate::types::coordinate::Coordinate;
use crate::utils::ensure_parent_dir_exists;
use bincode::config::{Configuration, Fixint, LittleEndian};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SCORER_FORMAT_VERSION: u32 = 1;
/// Length of the feature vector produced by [`AqiFeatures::to_vector`].
pub const FEATURE_COUNT: usize = 4;

const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

/// A pre-trained point predictor.
///
/// The feature order is fixed by whoever produced the model; the engine always
/// passes the vector built by [`AqiFeatures::to_vector`].
pub trait Scorer: Send + Sync + fmt::Debug {
    fn score(&self, features: &[f64]) -> f64;
}

/// Inputs of the air-quality scorer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AqiFeatures {
    pub coordinate: Coordinate,
    /// m/s
    pub wind_speed: f64,
    pub season: Season,
}

impl AqiFeatures {
    /// `[latitude, longitude, wind_speed, season_code]`
    pub fn to_vector(&self) -> [f64; FEATURE_COUNT] {
        [
            self.coordinate.latitude(),
            self.coordinate.longitude(),
            self.wind_speed,
            self.season.code(),
        ]
    }
}

#[derive(Debug, Error)]
pub enum ScorerError {
    #[error("Failed to read scorer artifact '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to write scorer artifact '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Failed to decode scorer artifact '{0}'")]
    Decode(PathBuf, #[source] Box<bincode::error::DecodeError>),

    #[error("Failed to encode scorer artifact")]
    Encode(#[source] Box<bincode::error::EncodeError>),

    #[error("Unsupported scorer artifact version {found}, expected {expected}")]
    Version { found: u32, expected: u32 },

    #[error("Scorer artifact has {found} features, expected {expected}")]
    FeatureCount { found: usize, expected: usize },

    #[error("Scorer artifact is invalid: {0}")]
    Invalid(&'static str),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// On-disk form of a [`LinearScorer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerArtifact {
    pub version: u32,
    pub feature_count: u32,
    pub means: Vec<f64>,
    pub scales: Vec<f64>,
    pub weights: Vec<f64>,
    pub intercept: f64,
}

/// A standardised linear regressor:
/// `intercept + Σ weight_i * (x_i - mean_i) / scale_i`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearScorer {
    means: [f64; FEATURE_COUNT],
    scales: [f64; FEATURE_COUNT],
    weights: [f64; FEATURE_COUNT],
    intercept: f64,
}

impl LinearScorer {
    pub fn new(
        means: [f64; FEATURE_COUNT],
        scales: [f64; FEATURE_COUNT],
        weights: [f64; FEATURE_COUNT],
        intercept: f64,
    ) -> Result<Self, ScorerError> {
        let scorer = Self {
            means,
            scales,
            weights,
            intercept,
        };
        scorer.validate()?;
        Ok(scorer)
    }

    fn validate(&self) -> Result<(), ScorerError> {
        let mut all = self
            .means
            .iter()
            .chain(&self.scales)
            .chain(&self.weights)
            .chain(std::iter::once(&self.intercept));
        if all.any(|v| !v.is_finite()) {
            return Err(ScorerError::Invalid("non-finite coefficient"));
        }
        if self.scales.iter().any(|s| *s == 0.0) {
            return Err(ScorerError::Invalid("zero feature scale"));
        }
        Ok(())
    }

    pub fn to_artifact(&self) -> ScorerArtifact {
        ScorerArtifact {
            version: SCORER_FORMAT_VERSION,
            feature_count: FEATURE_COUNT as u32,
            means: self.means.to_vec(),
            scales: self.scales.to_vec(),
            weights: self.weights.to_vec(),
            intercept: self.intercept,
        }
    }

    pub fn from_artifact(artifact: ScorerArtifact) -> Result<Self, ScorerError> {
        if artifact.version != SCORER_FORMAT_VERSION {
            return Err(ScorerError::Version {
                found: artifact.version,
                expected: SCORER_FORMAT_VERSION,
            });
        }
        let as_array = |values: Vec<f64>| -> Result<[f64; FEATURE_COUNT], ScorerError> {
            let found = values.len();
            values.try_into().map_err(|_| ScorerError::FeatureCount {
                found,
                expected: FEATURE_COUNT,
            })
        };
        if artifact.feature_count as usize != FEATURE_COUNT {
            return Err(ScorerError::FeatureCount {
                found: artifact.feature_count as usize,
                expected: FEATURE_COUNT,
            });
        }
        Self::new(
            as_array(artifact.means)?,
            as_array(artifact.scales)?,
            as_array(artifact.weights)?,
            artifact.intercept,
        )
    }

    /// Reads and validates an artifact written by [`LinearScorer::save`].
    pub async fn load(path: &Path) -> Result<Self, ScorerError> {
        let path_buf = path.to_path_buf();
        let scorer = tokio::task::spawn_blocking(move || Self::read_artifact(&path_buf)).await??;
        info!("Loaded scorer artifact from {}", path.display());
        Ok(scorer)
    }

    fn read_artifact(path: &Path) -> Result<Self, ScorerError> {
        let bytes =
            std::fs::read(path).map_err(|e| ScorerError::Read(path.to_path_buf(), e))?;
        let (artifact, _) =
            bincode::serde::decode_from_slice::<ScorerArtifact, _>(&bytes, BINCODE_CONFIG)
                .map_err(|e| ScorerError::Decode(path.to_path_buf(), Box::new(e)))?;
        Self::from_artifact(artifact)
    }

    /// Writes this scorer to `path`, creating parent directories as needed.
    pub async fn save(&self, path: &Path) -> Result<(), ScorerError> {
        let artifact = self.to_artifact();
        let bytes = tokio::task::spawn_blocking(move || {
            bincode::serde::encode_to_vec(&artifact, BINCODE_CONFIG)
                .map_err(|e| ScorerError::Encode(Box::new(e)))
        })
        .await??;
        ensure_parent_dir_exists(path)
            .await
            .map_err(|e| ScorerError::Write(path.to_path_buf(), e))?;
        tokio::fs::write(path, &bytes)
            .await
            .map_err(|e| ScorerError::Write(path.to_path_buf(), e))?;
        info!(
            "Wrote scorer artifact ({} bytes) to {}",
            bytes.len(),
            path.display()
        );
        Ok(())
    }
}

impl Scorer for LinearScorer {
    fn score(&self, features: &[f64]) -> f64 {
        self.intercept
            + features
                .iter()
                .zip(self.means.iter().zip(&self.scales).zip(&self.weights))
                .map(|(x, ((mean, scale), weight))| weight * (x - mean) / scale)
                .sum::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_scorer() -> LinearScorer {
        LinearScorer::new(
            [20.0, 78.0, 3.0, 1.0],
            [8.0, 10.0, 1.5, 0.8],
            [4.0, -2.0, -18.0, 25.0],
            110.0,
        )
        .unwrap()
    }

    #[test]
    fn test_score_at_means_is_intercept() {
        let scorer = sample_scorer();
        assert_eq!(scorer.score(&[20.0, 78.0, 3.0, 1.0]), 110.0);
    }

    #[test]
    fn test_windier_air_scores_lower() {
        let scorer = sample_scorer();
        let coordinate = Coordinate::new(28.61, 77.21).unwrap();
        let calm = AqiFeatures {
            coordinate,
            wind_speed: 1.0,
            season: Season::Winter,
        };
        let windy = AqiFeatures {
            wind_speed: 8.0,
            ..calm
        };
        assert!(scorer.score(&windy.to_vector()) < scorer.score(&calm.to_vector()));
    }

    #[test]
    fn test_rejects_zero_scale() {
        let result = LinearScorer::new([0.0; 4], [1.0, 0.0, 1.0, 1.0], [1.0; 4], 0.0);
        assert!(matches!(result, Err(ScorerError::Invalid(_))));
    }

    #[test]
    fn test_artifact_validation() {
        let mut artifact = sample_scorer().to_artifact();
        artifact.version = 99;
        assert!(matches!(
            LinearScorer::from_artifact(artifact),
            Err(ScorerError::Version { found: 99, .. })
        ));

        let mut artifact = sample_scorer().to_artifact();
        artifact.weights.pop();
        assert!(matches!(
            LinearScorer::from_artifact(artifact),
            Err(ScorerError::FeatureCount { found: 3, .. })
        ));
    }

    #[tokio::test]
    async fn test_save_then_load() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("models").join("aqi_scorer.bin");
        let scorer = sample_scorer();
        scorer.save(&path).await?;
        let loaded = LinearScorer::load(&path).await?;
        assert_eq!(loaded, scorer);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_missing_and_corrupt() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let missing = dir.path().join("absent.bin");
        assert!(matches!(
            LinearScorer::load(&missing).await,
            Err(ScorerError::Read(..))
        ));

        let corrupt = dir.path().join("corrupt.bin");
        tokio::fs::write(&corrupt, b"\x01\x02").await?;
        assert!(matches!(
            LinearScorer::load(&corrupt).await,
            Err(ScorerError::Decode(..))
        ));
        Ok(())
    }
}
