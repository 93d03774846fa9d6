//! # Quote Types
//!
//! Domain types and port traits for the USD/BRL quote service.
//! This crate has ZERO external IO dependencies - only data structures,
//! the error taxonomy, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Bid, QuoteEnvelope, StoredQuote)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for the HTTP boundary
//! - `error/` - Boundary errors, each classified by a `FailureKind`

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{Bid, QuoteEnvelope, StoredQuote, UsdBrl};
pub use dto::{BidResponse, ErrorResponse};
pub use error::{AppError, FailureKind, FetchError, RepoError};
pub use ports::{QuoteFetcher, QuoteRepository};
