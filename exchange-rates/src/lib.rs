//! Upstream USD/BRL quote provider.
//!
//! Issues a single GET against the AwesomeAPI economia endpoint and hands the
//! raw body back to the caller. The whole exchange (connect, headers, body)
//! is bounded by one budget, 200ms unless configured otherwise. Dropping the
//! returned future abandons the request.
//!
//! # Example
//! ```no_run
//! use exchange_rates::AwesomeApiProvider;
//! use quote_types::{QuoteEnvelope, QuoteFetcher};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = AwesomeApiProvider::new();
//! let body = provider.fetch_raw().await?;
//! let bid = QuoteEnvelope::from_slice(&body)?.into_bid();
//! println!("{bid}");
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use quote_types::{FetchError, QuoteFetcher};

/// Default upstream endpoint.
pub const UPSTREAM_URL: &str = "https://economia.awesomeapi.com.br/json/last/USD-BRL";

/// Default budget for one upstream request.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_millis(200);

// ─────────────────────────────────────────────────────────────────────────────
// Provider
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP adapter for the [`QuoteFetcher`] port.
pub struct AwesomeApiProvider {
    url: String,
    timeout: Duration,
    http: Client,
}

impl Default for AwesomeApiProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl AwesomeApiProvider {
    /// Creates a provider for the public endpoint with the default budget.
    pub fn new() -> Self {
        Self::with_url(UPSTREAM_URL)
    }

    /// Creates a provider for another endpoint serving the same document.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: UPSTREAM_TIMEOUT,
            http: Client::new(),
        }
    }

    /// Overrides the request budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the underlying HTTP client.
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn get_body(&self) -> Result<Vec<u8>, FetchError> {
        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(|e| self.classify(e))?;
        Ok(body.to_vec())
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                url: self.url.clone(),
                budget: self.timeout,
            }
        } else {
            FetchError::Transport {
                url: self.url.clone(),
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl QuoteFetcher for AwesomeApiProvider {
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    async fn fetch_raw(&self) -> Result<Vec<u8>, FetchError> {
        let result = match tokio::time::timeout(self.timeout, self.get_body()).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                url: self.url.clone(),
                budget: self.timeout,
            }),
        };

        match &result {
            Ok(body) => tracing::debug!(bytes = body.len(), "upstream quote received"),
            Err(e) if e.kind().is_timeout() => {
                tracing::warn!("Request to {} timed out after {:?}", self.url, self.timeout)
            }
            Err(e) => tracing::warn!(error = %e, "upstream request failed"),
        }

        result
    }

    fn source(&self) -> &str {
        &self.url
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
