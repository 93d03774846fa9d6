//! Domain models for the quote service.

pub mod bid;
pub mod quote;

pub use bid::Bid;
pub use quote::{QuoteEnvelope, StoredQuote, UsdBrl};
