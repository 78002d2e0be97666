//! Market data module - price history cache, realtime quotes, and sync service.

mod market_data_model;
mod market_data_service;
mod market_data_traits;
pub mod price_history_store;
pub mod price_lookup;

#[cfg(test)]
mod market_data_service_tests;

// Re-export the public interface
pub use market_data_model::{
    InstrumentSyncResult, PriceHistory, PriceSnapshot, RealtimeQuotes, SyncOutcome, SyncReport,
};
pub use market_data_service::PriceService;
pub use market_data_traits::PriceServiceTrait;
pub use price_history_store::PriceHistoryStore;
pub use price_lookup::{latest_point, monday_baseline, resolve_t_day_price, TDayMatch, TDayPrice};

// Re-export provider-facing types for convenience
pub use fundpilot_market_data::{MarketDataError, PricePoint, PriceProvider};
