//! # Quote Repository
//!
//! Concrete store adapter for the quote service.
//! This crate provides the SQLite adapter that implements the `QuoteRepository` port.

pub mod sqlite;

mod types;


pub use sqlite::SqliteRepo;

/// Build and initialize a repository from a database URL.
///
/// This function:
/// 1. Connects to the database
/// 2. Creates the `cotacao` table if it does not exist
/// 3. Returns a ready-to-use `SqliteRepo`
///
/// # Examples
///
/// ```ignore
/// let repo = build_repo("sqlite://database.sqlite3").await?;
/// let repo = build_repo("sqlite::memory:").await?;
/// ```
pub async fn build_repo(database_url: &str) -> anyhow::Result<SqliteRepo> {
    SqliteRepo::new(database_url).await
}
