//! Repository port trait.
//!
//! Adapters (SQLite, in-memory mocks) implement this trait.

use std::time::Duration;

use crate::domain::{Bid, StoredQuote};
use crate::error::RepoError;

/// The store port for served quotes.
#[async_trait::async_trait]
pub trait QuoteRepository: Send + Sync + 'static {
    /// Inserts one row holding `bid`.
    ///
    /// Must not run past `budget`. When it fires the row MUST NOT be
    /// committed and `RepoError::Timeout` is returned.
    async fn save_bid(&self, bid: &Bid, budget: Duration) -> Result<StoredQuote, RepoError>;
}
