//! Provider error types.
//!
//! Every variant here means "this provider is unavailable for this request".
//! The aggregator logs them and carries on with the other providers.

use std::time::Duration;

use crate::cities::CityNotFound;

/// Errors from a single provider fetch.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider has no id for one of the route's cities
    #[error(transparent)]
    UnknownCity(#[from] CityNotFound),

    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Site returned a non-success status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the site
    #[error("rate limited")]
    RateLimited,

    /// Response body wasn't in the expected shape
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Response parsed but reported a failure status
    #[error("provider rejected request: {message}")]
    Rejected { message: String },

    /// No answer within the provider's time budget
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// Client couldn't be set up
    #[error("not configured: {0}")]
    NotConfigured(String),
}

impl ProviderError {
    /// Build a `Json` error, keeping a bounded prefix of the offending body.
    pub(crate) fn json(err: &serde_json::Error, body: &str) -> Self {
        ProviderError::Json {
            message: err.to_string(),
            body: Some(body.chars().take(500).collect()),
        }
    }
}
