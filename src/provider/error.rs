use std::error::Error as StdError;
use std::io;
use thiserror::Error;

/// Failure to retrieve historical samples. Every variant means the upstream
/// data is unavailable for this request; callers fall back to the seasonal model.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("Request to {0} timed out")]
    Timeout(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Response from {url} exceeds the {limit} byte limit")]
    PayloadTooLarge { url: String, limit: usize },

    #[error("Failed to parse upstream JSON payload")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("Upstream payload has no '{0}' section")]
    MissingSection(&'static str),

    #[error("Unparsable date key '{0}' in upstream payload")]
    InvalidDateKey(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

impl ProviderError {
    /// Classifies a reqwest failure for `url`.
    pub(crate) fn from_request(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            return ProviderError::Timeout(url.to_string(), error);
        }
        match error.status() {
            Some(status) => ProviderError::HttpStatus {
                url: url.to_string(),
                status,
                source: error,
            },
            None => ProviderError::NetworkRequest(url.to_string(), error),
        }
    }

    /// Connection refused/reset style failures, which get one immediate retry.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::NetworkRequest(_, e) => e.is_connect() || is_connection_reset(e),
            _ => false,
        }
    }
}

fn is_connection_reset(error: &reqwest::Error) -> bool {
    let mut source = error.source();
    while let Some(err) = source {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::ConnectionReset {
                return true;
            }
        }
        source = err.source();
    }
    false
}
