use crate::config::EngineConfig;
use crate::provider::error::ProviderError;
use crate::provider::payload::parse_samples;
use crate::provider::sample_provider::SampleProvider;
use crate::types::coordinate::Coordinate;
use crate::types::parameter::Parameter;
use crate::types::sample::ClimateSample;
use async_trait::async_trait;
use chrono::NaiveDate;
use futures_util::TryStreamExt;
use log::{info, warn};
use reqwest::Client;

const DATE_FORMAT: &str = "%Y%m%d";

/// Fetches daily point data from the NASA POWER API.
///
/// One `reqwest::Client` is shared across requests; every call is bounded by
/// the configured timeout and response size. Dropping the returned future
/// aborts the in-flight request.
#[derive(Debug, Clone)]
pub struct PowerClient {
    client: Client,
    base_url: String,
    community: String,
    max_payload_bytes: usize,
}

impl PowerClient {
    pub fn new(config: &EngineConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ProviderError::ClientBuild)?;
        Ok(Self {
            client,
            base_url: config.power_url.clone(),
            community: config.community.clone(),
            max_payload_bytes: config.max_payload_bytes,
        })
    }

    pub(crate) fn request_url(
        &self,
        coordinate: Coordinate,
        start: NaiveDate,
        end: NaiveDate,
        parameters: &[Parameter],
    ) -> String {
        let codes: Vec<&str> = parameters.iter().map(|p| p.code()).collect();
        format!(
            "{}?parameters={}&community={}&longitude={}&latitude={}&start={}&end={}&format=JSON",
            self.base_url,
            codes.join(","),
            self.community,
            coordinate.longitude(),
            coordinate.latitude(),
            start.format(DATE_FORMAT),
            end.format(DATE_FORMAT),
        )
    }

    async fn download_with_retry(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        match self.download(url).await {
            Err(e) if e.is_transient() => {
                warn!("Transient error for {}, retrying once: {}", url, e);
                self.download(url).await
            }
            other => other,
        }
    }

    /// Downloads the body of `url`, streaming so an oversized payload is
    /// rejected without being buffered in full.
    async fn download(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        info!("Downloading data from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::from_request(url, e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(ProviderError::from_request(url, e));
            }
        };

        let too_large = || ProviderError::PayloadTooLarge {
            url: url.to_string(),
            limit: self.max_payload_bytes,
        };
        if response
            .content_length()
            .is_some_and(|len| len > self.max_payload_bytes as u64)
        {
            return Err(too_large());
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream
            .try_next()
            .await
            .map_err(|e| ProviderError::from_request(url, e))?
        {
            if body.len() + chunk.len() > self.max_payload_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait]
impl SampleProvider for PowerClient {
    async fn fetch(
        &self,
        coordinate: Coordinate,
        start: NaiveDate,
        end: NaiveDate,
        parameters: &[Parameter],
    ) -> Result<Vec<ClimateSample>, ProviderError> {
        if parameters.is_empty() || start > end {
            return Ok(Vec::new());
        }
        let url = self.request_url(coordinate, start, end, parameters);
        let bytes = self.download_with_retry(&url).await?;
        let samples = parse_samples(&bytes, start, end)?;
        info!(
            "Received {} daily samples for {} ({} to {})",
            samples.len(),
            coordinate,
            start,
            end
        );
        Ok(samples)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}
