//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Executor, Sqlite, SqlitePool, Transaction};
use tokio::time::Instant;

use quote_types::{Bid, QuoteRepository, RepoError, StoredQuote};

use crate::types::{DbInsertedQuote, DbQuote};

/// Lock wait for everything but the COMMIT of a budgeted write.
const LOCK_WAIT: Duration = Duration::from_secs(5);

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
///
/// Holds a single connection for the life of the process. Concurrent writers
/// queue on it, and that wait counts against their write budget. A write
/// reported as timed out never leaves a row behind.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Opens the store and creates the `cotacao` table if absent.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .busy_timeout(LOCK_WAIT);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let repo = Self { pool };
        repo.create_schema().await?;

        tracing::debug!("SQLite store ready at {}", database_url);
        Ok(repo)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the schema. Safe to run against an existing database.
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        let ddl = include_str!("../migrations/0001_create_cotacao.sql");
        sqlx::query(ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }

    /// Lists the latest stored quotes, newest first.
    pub async fn recent(&self, limit: i64) -> Result<Vec<StoredQuote>, RepoError> {
        let rows: Vec<DbQuote> =
            sqlx::query_as(r#"SELECT bid, date FROM cotacao ORDER BY rowid DESC LIMIT ?"#)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbQuote::into_domain).collect()
    }

    /// Counts stored quotes.
    pub async fn count(&self) -> Result<i64, RepoError> {
        sqlx::query_scalar(r#"SELECT COUNT(*) FROM cotacao"#)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))
    }

    /// Begins the write and inserts the row, leaving the COMMIT to the caller.
    ///
    /// The connection's lock wait is capped at whatever is left until
    /// `deadline`, so the COMMIT that follows cannot outwait the budget.
    async fn stage(
        &self,
        bid: &Bid,
        deadline: Instant,
    ) -> Result<(Transaction<'static, Sqlite>, DbInsertedQuote), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        let row: DbInsertedQuote = sqlx::query_as(
            r#"INSERT INTO cotacao (bid) VALUES (?) RETURNING rowid AS id, bid, date"#,
        )
        .bind(bid.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        set_lock_wait(&mut *tx, deadline.saturating_duration_since(Instant::now())).await?;

        Ok((tx, row))
    }

    /// Removes a row whose COMMIT landed after its budget ran out.
    async fn discard(&self, id: i64) -> Result<(), RepoError> {
        sqlx::query(r#"DELETE FROM cotacao WHERE rowid = ?"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }
}

/// Sets SQLite's busy timeout on the connection behind `executor`.
async fn set_lock_wait<'e, E>(executor: E, wait: Duration) -> Result<(), RepoError>
where
    E: Executor<'e, Database = Sqlite>,
{
    // Rounded up: SQLite gives up after at least this many milliseconds.
    let millis = wait.as_millis() + 1;
    sqlx::query(&format!("PRAGMA busy_timeout = {}", millis))
        .persistent(false)
        .execute(executor)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl QuoteRepository for SqliteRepo {
    async fn save_bid(&self, bid: &Bid, budget: Duration) -> Result<StoredQuote, RepoError> {
        let deadline = Instant::now() + budget;

        // A staged transaction dropped before COMMIT rolls back.
        let (tx, row) = match tokio::time::timeout_at(deadline, self.stage(bid, deadline)).await {
            Ok(staged) => staged?,
            Err(_) => return Err(RepoError::Timeout { budget }),
        };

        // Once sent, a COMMIT runs to completion on the worker whether or not
        // anyone awaits it, so it is awaited here and judged afterwards.
        let committed = tx
            .commit()
            .await
            .map_err(|e| RepoError::Database(e.to_string()));
        let late = Instant::now() >= deadline;

        if let Err(e) = set_lock_wait(&self.pool, LOCK_WAIT).await {
            tracing::warn!(error = %e, "failed to restore SQLite lock wait");
        }

        match committed {
            Ok(()) if late => {
                if let Err(e) = self.discard(row.id).await {
                    tracing::error!(error = %e, rowid = row.id, "failed to discard late write");
                    return Err(e);
                }
                tracing::debug!(rowid = row.id, "discarded write committed past its budget");
                Err(RepoError::Timeout { budget })
            }
            Ok(()) => row.quote.into_domain(),
            Err(_) if late => Err(RepoError::Timeout { budget }),
            Err(e) => Err(e),
        }
    }
}
