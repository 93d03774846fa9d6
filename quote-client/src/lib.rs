//! # Quote Client SDK
//!
//! A typed Rust client for the local `/cotacao` endpoint, plus the writer for
//! the `cotacao.txt` output file.

use std::path::Path;
use std::time::Duration;

use quote_types::{Bid, BidResponse, FailureKind};
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Default budget for the whole round trip (send + decode).
pub const CLIENT_TIMEOUT: Duration = Duration::from_millis(300);

/// Default output file.
pub const OUTPUT_FILE: &str = "cotacao.txt";

/// Label written in front of the bid.
const LABEL: &str = "Dólar:";

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request to {url} timed out after {budget:?}")]
    Timeout { url: String, budget: Duration },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ClientError::Timeout { .. } => FailureKind::Timeout,
            ClientError::Http(e) if e.is_timeout() => FailureKind::Timeout,
            ClientError::Http(e) if e.is_decode() => FailureKind::Decode,
            ClientError::Http(_) | ClientError::Api { .. } => FailureKind::Transport,
            ClientError::Json(_) => FailureKind::Decode,
            ClientError::Io(_) => FailureKind::Persistence,
        }
    }
}

/// Client for the local quote server.
pub struct CotacaoClient {
    base_url: String,
    timeout: Duration,
    http: Client,
}

impl CotacaoClient {
    /// Creates a new client with the default round-trip budget.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: CLIENT_TIMEOUT,
            http: Client::new(),
        }
    }

    /// Overrides the round-trip budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the underlying HTTP client.
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Full URL of the quote endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/cotacao", self.base_url)
    }

    /// Fetches the current bid from the server.
    ///
    /// Sending the request and decoding the body share one budget; when it
    /// fires the in-flight request is dropped and `ClientError::Timeout`
    /// is returned.
    pub async fn fetch_bid(&self) -> Result<Bid, ClientError> {
        let url = self.endpoint();
        match tokio::time::timeout(self.timeout, self.get::<BidResponse>(&url)).await {
            Ok(result) => result.map(|resp| resp.bid),
            Err(_) => Err(ClientError::Timeout {
                url,
                budget: self.timeout,
            }),
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(body);
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// Renders the output line for a bid.
pub fn render_quote(bid: &Bid) -> String {
    format!("{}{}", LABEL, bid)
}

/// Writes the bid to `path`, replacing whatever was there.
pub async fn write_quote_file(path: impl AsRef<Path>, bid: &Bid) -> Result<(), ClientError> {
    let path = path.as_ref();
    tokio::fs::write(path, render_quote(bid)).await?;
    tracing::debug!("wrote {}", path.display());
    Ok(())
}

/// Fetches the current bid and writes it to `path`.
///
/// The file is only touched once the fetch has succeeded, so a timed-out or
/// failed request leaves any previous content in place.
pub async fn save_current_quote(
    client: &CotacaoClient,
    path: impl AsRef<Path>,
) -> Result<Bid, ClientError> {
    let bid = client.fetch_bid().await?;
    write_quote_file(path, &bid).await?;
    Ok(bid)
}
