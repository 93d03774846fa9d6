//! Upstream quote document and the persisted quote record.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::bid::Bid;

/// Wire document returned by the upstream quote API.
///
/// Only the `USDBRL` entry is read; a document without it does not decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteEnvelope {
    #[serde(rename = "USDBRL")]
    pub usdbrl: UsdBrl,
}

/// One currency-pair quote as sent upstream. Every field is text.
///
/// `bid` is mandatory. The remaining fields are decoded for shape
/// compatibility and default to empty text when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsdBrl {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub codein: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub high: String,
    #[serde(default)]
    pub low: String,
    #[serde(rename = "varBid", default)]
    pub var_bid: String,
    #[serde(rename = "pctChange", default)]
    pub pct_change: String,
    pub bid: Bid,
    #[serde(default)]
    pub ask: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub create_date: String,
}

impl QuoteEnvelope {
    /// Decodes a raw upstream body.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Consumes the envelope, keeping only the bid.
    pub fn into_bid(self) -> Bid {
        self.usdbrl.bid
    }
}

/// A row of the `cotacao` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredQuote {
    pub bid: Bid,
    /// Assigned by the store at insert time (UTC).
    pub created_at: NaiveDateTime,
}
