use crate::provider::error::ProviderError;
use crate::types::coordinate::Coordinate;
use crate::types::parameter::Parameter;
use crate::types::sample::ClimateSample;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

/// A source of historical daily samples for one coordinate.
///
/// Implementations return samples in chronological order, covering the
/// inclusive range `start..=end`. A day the source has no record for is simply
/// absent from the result. Any upstream failure is reported as an error and
/// never as a partial collection.
#[async_trait]
pub trait SampleProvider: Send + Sync {
    async fn fetch(
        &self,
        coordinate: Coordinate,
        start: NaiveDate,
        end: NaiveDate,
        parameters: &[Parameter],
    ) -> Result<Vec<ClimateSample>, ProviderError>;

    /// Upstream location shown in health snapshots.
    fn describe(&self) -> String {
        String::from("custom provider")
    }
}

#[async_trait]
impl<T: SampleProvider + ?Sized> SampleProvider for Arc<T> {
    async fn fetch(
        &self,
        coordinate: Coordinate,
        start: NaiveDate,
        end: NaiveDate,
        parameters: &[Parameter],
    ) -> Result<Vec<ClimateSample>, ProviderError> {
        (**self).fetch(coordinate, start, end, parameters).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
