//! Error types for the quote service.
//!
//! Every boundary (upstream fetch, store write, HTTP response) has its own
//! error enum. Each one reports a [`FailureKind`] so callers can branch on a
//! stated classification instead of inspecting error internals.

use std::time::Duration;

/// Classification attached to every boundary error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// A deadline fired before the operation finished.
    Timeout,
    /// Network-level failure or an unexpected upstream status.
    Transport,
    /// A body did not decode into the expected shape.
    Decode,
    /// The store rejected the write.
    Persistence,
}

impl FailureKind {
    pub fn is_timeout(self) -> bool {
        matches!(self, FailureKind::Timeout)
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FailureKind::Timeout => "timeout",
            FailureKind::Transport => "transport",
            FailureKind::Decode => "decode",
            FailureKind::Persistence => "persistence",
        };
        f.write_str(s)
    }
}

/// Upstream fetch errors.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Request to {url} timed out after {budget:?}")]
    Timeout { url: String, budget: Duration },

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Timeout { .. } => FailureKind::Timeout,
            FetchError::Transport { .. } | FetchError::Status { .. } => FailureKind::Transport,
        }
    }
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Database operation timed out after {budget:?}")]
    Timeout { budget: Duration },

    #[error("Database error: {0}")]
    Database(String),
}

impl RepoError {
    pub fn kind(&self) -> FailureKind {
        match self {
            RepoError::Timeout { .. } => FailureKind::Timeout,
            RepoError::Database(_) => FailureKind::Persistence,
        }
    }
}

/// Application-level errors (for HTTP responses).
///
/// Every variant maps to a 500 response; the kind only drives diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Upstream(#[from] FetchError),

    #[error("Invalid upstream quote: {0}")]
    Decode(String),

    #[error(transparent)]
    Store(#[from] RepoError),
}

impl AppError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AppError::Upstream(e) => e.kind(),
            AppError::Decode(_) => FailureKind::Decode,
            AppError::Store(e) => e.kind(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}
