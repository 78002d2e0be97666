//! Market data models
//!
//! - `price_point` - Dated net-asset-value samples and series normalization

mod price_point;

pub use price_point::{normalize_series, PricePoint, CASH_INSTRUMENT_CODE};
