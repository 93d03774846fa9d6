//! Upstream quote provider port.
//!
//! Implementations can be HTTP clients, mock providers, etc.

use crate::error::FetchError;

/// Port trait for the upstream quote source.
#[async_trait::async_trait]
pub trait QuoteFetcher: Send + Sync + 'static {
    /// Performs one bounded request and returns the raw body.
    ///
    /// The implementation owns its deadline and must report
    /// `FetchError::Timeout` when it fires. Decoding is left to the caller.
    async fn fetch_raw(&self) -> Result<Vec<u8>, FetchError>;

    /// Where the quote comes from, for diagnostics.
    fn source(&self) -> &str;
}
