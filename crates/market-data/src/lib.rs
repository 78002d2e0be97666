//! Fundpilot Market Data Crate
//!
//! This crate provides provider-agnostic fund price fetching for the
//! Fundpilot application.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Historical net-asset-value series per fund code
//! - Intraday (realtime) valuation estimates
//! - Normalization of provider timestamps into market-local trading dates
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |   Domain Layer   | --> |  PriceProvider   |  (trait, two methods)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          | FundDataProvider |  (HTTP script endpoints)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    PricePoint    |  (date, nav)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`PricePoint`] - One dated net-asset-value sample
//! - [`PriceProvider`] - Historical series and realtime valuation source
//! - [`FundDataProvider`] - Reqwest-backed implementation
//! - [`MarketDataError`] - Errors raised by providers

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{normalize_series, PricePoint, CASH_INSTRUMENT_CODE};
pub use provider::fund_data::{FundDataProvider, FundDataProviderConfig};
pub use provider::{PriceProvider, ProviderCapabilities};
