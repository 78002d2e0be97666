use async_trait::async_trait;

use super::{PriceSnapshot, RealtimeQuotes, SyncReport};
use crate::errors::Result;

/// Service trait for price history and realtime quotes.
#[async_trait]
pub trait PriceServiceTrait: Send + Sync {
    /// Loads the persisted history cache into memory; returns the number of instruments.
    fn load_cache(&self) -> Result<usize>;

    /// Immutable view of history and realtime quotes, taken together.
    fn snapshot(&self) -> PriceSnapshot;

    /// Fetches full history for each code concurrently and updates the cache
    /// per instrument. Provider failures are reported, not returned.
    async fn sync_history(&self, codes: &[String]) -> Result<SyncReport>;

    /// Refreshes realtime quotes for `codes`. Failed lookups are left out.
    async fn refresh_realtime(&self, codes: &[String]) -> Result<RealtimeQuotes>;
}
