//! Quote Application Service
//!
//! Orchestrates one `/cotacao` request: fetch the upstream document, decode
//! it, store the bid. Contains NO infrastructure logic - each step goes
//! through a port, and each step fails independently.

use std::time::Duration;

use quote_types::{AppError, Bid, QuoteEnvelope, QuoteFetcher, QuoteRepository};

/// Default budget for one store write.
pub const STORE_TIMEOUT: Duration = Duration::from_millis(10);

/// Application service for quote requests.
///
/// Generic over the fetcher and the repository - both adapters are injected
/// at construction and owned by the service. This enables:
/// - Testing with mock adapters
/// - Running the HTTP layer without a network listener
///
/// The server has no overall per-request deadline. The upstream budget lives
/// in the fetcher and the write budget here, so a request is already bounded
/// by their sum plus decoding.
pub struct QuoteService<F: QuoteFetcher, R: QuoteRepository> {
    fetcher: F,
    repo: R,
    store_timeout: Duration,
}

impl<F: QuoteFetcher, R: QuoteRepository> QuoteService<F, R> {
    /// Creates a new quote service with the default write budget.
    pub fn new(fetcher: F, repo: R) -> Self {
        Self {
            fetcher,
            repo,
            store_timeout: STORE_TIMEOUT,
        }
    }

    /// Overrides the write budget.
    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn store_timeout(&self) -> Duration {
        self.store_timeout
    }

    /// Fetches the current bid and records it.
    ///
    /// Either exactly one row is written and the bid returned, or nothing is
    /// written and the failing step's error is returned.
    pub async fn current_bid(&self) -> Result<Bid, AppError> {
        let body = self.fetcher.fetch_raw().await?;

        let bid = match QuoteEnvelope::from_slice(&body) {
            Ok(envelope) => envelope.into_bid(),
            Err(e) => {
                tracing::warn!(
                    source = self.fetcher.source(),
                    error = %e,
                    "upstream quote did not decode"
                );
                return Err(e.into());
            }
        };

        match self.repo.save_bid(&bid, self.store_timeout).await {
            Ok(stored) => {
                tracing::debug!(bid = %stored.bid, created_at = %stored.created_at, "quote stored");
                Ok(stored.bid)
            }
            Err(e) if e.kind().is_timeout() => {
                tracing::warn!("Database operation timed out after {:?}", self.store_timeout);
                Err(e.into())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to store quote");
                Err(e.into())
            }
        }
    }
}
