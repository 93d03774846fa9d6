//! Database row types and their mapping to domain values.

use chrono::NaiveDateTime;
use sqlx::FromRow;

use quote_types::{Bid, RepoError, StoredQuote};

/// Format SQLite uses for `CURRENT_TIMESTAMP`.
const SQLITE_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// `cotacao` row as read back from SQLite. Both columns are nullable TEXT.
#[derive(FromRow)]
pub struct DbQuote {
    pub bid: Option<String>,
    pub date: Option<String>,
}

/// Row returned by the insert: the stored columns plus their rowid.
#[derive(FromRow)]
pub struct DbInsertedQuote {
    pub id: i64,
    #[sqlx(flatten)]
    pub quote: DbQuote,
}

impl DbQuote {
    pub fn into_domain(self) -> Result<StoredQuote, RepoError> {
        let date = self
            .date
            .ok_or_else(|| RepoError::Database("cotacao row without date".into()))?;

        let created_at = NaiveDateTime::parse_from_str(&date, SQLITE_TIMESTAMP)
            .map_err(|e| RepoError::Database(format!("invalid date {:?}: {}", date, e)))?;

        Ok(StoredQuote {
            bid: Bid::new(self.bid.unwrap_or_default()),
            created_at,
        })
    }
}
