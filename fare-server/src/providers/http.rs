//! Shared HTTP plumbing for provider clients.
//!
//! Builds a `reqwest` client with the fixed User-Agent and timeout, bounds
//! concurrent requests per provider with a semaphore, and turns HTTP status
//! failures into [`ProviderError`]s.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use tokio::sync::Semaphore;

use super::error::ProviderError;

/// User-Agent sent to every booking site.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Per-provider request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default maximum concurrent requests to one site.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration shared by all provider clients.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base URL override (defaults to the provider's production site)
    pub base_url: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum concurrent requests to this provider
    pub max_concurrent: usize,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ProviderConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    /// Returns the timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// A configured HTTP client for one provider.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    semaphore: Arc<Semaphore>,
}

impl HttpTransport {
    /// Create a transport, falling back to `default_base_url` when the
    /// config has no override.
    pub fn new(config: &ProviderConfig, default_base_url: &str) -> Result<Self, ProviderError> {
        if config.max_concurrent == 0 {
            return Err(ProviderError::NotConfigured(
                "max_concurrent must be at least 1".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| ProviderError::NotConfigured("invalid User-Agent".to_string()))?;
        headers.insert(USER_AGENT, user_agent);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(default_base_url)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            http,
            base_url,
            timeout: config.timeout(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Join a path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// The request timeout this transport was built with.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET a page and return its body text.
    pub async fn get_text(&self, url: &str) -> Result<String, ProviderError> {
        let _permit = self.acquire().await?;
        let response = self.http.get(url).send().await?;
        read_body(response).await
    }

    /// POST a JSON body and return the response text.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<String, ProviderError> {
        let _permit = self.acquire().await?;
        let response = self.http.post(url).json(body).send().await?;
        read_body(response).await
    }

    async fn acquire(&self) -> Result<tokio::sync::SemaphorePermit<'_>, ProviderError> {
        self.semaphore
            .acquire()
            .await
            .map_err(|_| ProviderError::NotConfigured("semaphore closed".to_string()))
    }
}

/// Check the status and read the body.
async fn read_body(response: reqwest::Response) -> Result<String, ProviderError> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Api {
            status: status.as_u16(),
            message: body.chars().take(500).collect(),
        });
    }

    Ok(response.text().await?)
}
