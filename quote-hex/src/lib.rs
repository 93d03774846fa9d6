//! # Quote Hex
//!
//! Application service layer and HTTP adapter for the quote service.
//!
//! ## Architecture
//!
//! - `service/` - Application service (fetch, decode, store under budgets)
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `F: QuoteFetcher` and `R: QuoteRepository`,
//! so the upstream client and the store are injected at construction.

pub mod inbound;
pub mod service;


pub use service::{QuoteService, STORE_TIMEOUT};
