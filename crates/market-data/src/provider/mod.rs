//! Price provider abstractions and implementations.
//!
//! This module contains:
//! - The `PriceProvider` trait that all providers implement
//! - Provider capabilities
//! - The HTTP fund-data provider
//!
//! The core only ever talks to `dyn PriceProvider`; the transport a provider
//! uses to reach its upstream is its own business.

mod capabilities;
mod traits;

pub mod fund_data;

// Re-exports
pub use capabilities::ProviderCapabilities;
pub use traits::PriceProvider;
