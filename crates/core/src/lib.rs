//! Fundpilot Core - Domain entities, services, and traits.
//!
//! This crate contains the ledger aggregation and rebalancing logic for
//! Fundpilot. It is database-agnostic and defines the keyed-store trait that
//! is implemented by the `storage-sqlite` crate.

pub mod backup;
pub mod constants;
pub mod errors;
pub mod market_data;
pub mod portfolio;
pub mod preferences;
pub mod store;
pub mod strategy;
pub mod transactions;
pub mod utils;

// Re-export common types from the ledger and portfolio modules
pub use portfolio::*;
pub use transactions::{Category, Transaction, TransactionAction};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
