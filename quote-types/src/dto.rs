//! Data Transfer Objects (DTOs) for the `/cotacao` HTTP contract.

use serde::{Deserialize, Serialize};

use crate::domain::Bid;

/// Success body of `GET /cotacao`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidResponse {
    pub bid: Bid,
}

/// Failure body of `GET /cotacao`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
