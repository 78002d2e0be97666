//! Price provider trait definitions.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::MarketDataError;
use crate::models::PricePoint;

use super::capabilities::ProviderCapabilities;

/// Trait for fund price providers.
///
/// Implement this trait to add support for a new price source. Providers
/// never retry and never cache; a failed call is reported to the caller,
/// which falls back to whatever it already has.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use fundpilot_market_data::{MarketDataError, PricePoint, PriceProvider};
///
/// struct FixedProvider;
///
/// #[async_trait]
/// impl PriceProvider for FixedProvider {
///     fn id(&self) -> &'static str {
///         "FIXED"
///     }
///
///     async fn fetch_history(&self, code: &str) -> Result<Vec<PricePoint>, MarketDataError> {
///         Ok(vec![])
///     }
///
///     async fn fetch_realtime(&self, code: &str) -> Result<rust_decimal::Decimal, MarketDataError> {
///         Err(MarketDataError::NoData(code.to_string()))
///     }
/// }
/// ```
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs and sync reports.
    fn id(&self) -> &'static str;

    /// Describes what this provider can do.
    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::default()
    }

    /// Fetch the full NAV history for a fund code.
    ///
    /// The returned series is sorted ascending by date. An unknown code or
    /// the cash pseudo-instrument yields an empty series, never zeros.
    async fn fetch_history(&self, code: &str) -> Result<Vec<PricePoint>, MarketDataError>;

    /// Fetch the current intraday valuation estimate for a fund code.
    async fn fetch_realtime(&self, code: &str) -> Result<Decimal, MarketDataError>;
}
