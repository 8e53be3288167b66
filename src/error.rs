use crate::export::table::ExportError;
use crate::prediction::scorer::ScorerError;
use crate::provider::error::ProviderError;
use crate::validation::InvalidInput;
use thiserror::Error;

/// Errors surfaced by [`crate::ClimateOdds`].
///
/// Upstream and scorer failures are recovered inside the engine, so an
/// operation only fails on invalid input or when its result cannot be rendered.
#[derive(Debug, Error)]
pub enum ClimateError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Scorer(#[from] ScorerError),
}
