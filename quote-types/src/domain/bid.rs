//! Bid domain model.

use serde::{Deserialize, Serialize};

/// Purchase-side USD→BRL rate, carried as opaque text.
///
/// The value is never parsed as a number: whatever the upstream API sends
/// is what gets stored, served and written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bid(String);

impl Bid {
    /// Wraps raw bid text.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the bid text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Bid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Bid {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Bid {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
