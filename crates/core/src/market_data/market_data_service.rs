use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, error, info, warn};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use fundpilot_market_data::{PriceProvider, CASH_INSTRUMENT_CODE};

use super::{
    InstrumentSyncResult, PriceHistory, PriceHistoryStore, PriceServiceTrait, PriceSnapshot,
    RealtimeQuotes, SyncOutcome, SyncReport,
};
use crate::constants::store_keys;
use crate::errors::Result;
use crate::store::{load_json, save_json, KeyValueStoreTrait};

/// Keeps the price history cache in memory and in the keyed store, and
/// refreshes it from a [`PriceProvider`].
pub struct PriceService {
    provider: Arc<dyn PriceProvider>,
    store: Arc<dyn KeyValueStoreTrait>,
    history: PriceHistoryStore,
    realtime: RwLock<Arc<RealtimeQuotes>>,
    // One persistence pass at a time so a slow batch cannot overwrite a newer one.
    persist_lock: Mutex<()>,
}

impl PriceService {
    pub fn new(provider: Arc<dyn PriceProvider>, store: Arc<dyn KeyValueStoreTrait>) -> Self {
        Self {
            provider,
            store,
            history: PriceHistoryStore::default(),
            realtime: RwLock::new(Arc::new(RealtimeQuotes::new())),
            persist_lock: Mutex::new(()),
        }
    }

    fn syncable_codes(codes: &[String]) -> Vec<String> {
        let mut unique: Vec<String> = Vec::new();
        for code in codes {
            if code.is_empty() || code == CASH_INSTRUMENT_CODE {
                continue;
            }
            if !unique.contains(code) {
                unique.push(code.clone());
            }
        }
        unique
    }

    async fn sync_one(&self, code: String) -> InstrumentSyncResult {
        let outcome = match self.provider.fetch_history(&code).await {
            Ok(series) if series.is_empty() => {
                warn!("Provider returned no history for {}; keeping cache", code);
                SyncOutcome::NoData
            }
            Ok(series) => {
                let points = series.len();
                let latest_date = series.last().map(|p| p.date);
                self.history.replace_series(&code, series);
                debug!("Cached {} points for {}", points, code);
                SyncOutcome::Updated {
                    points,
                    latest_date,
                }
            }
            Err(e) => {
                warn!("History sync failed for {}: {}", code, e);
                SyncOutcome::Failed {
                    message: e.to_string(),
                    transient: e.is_transient(),
                }
            }
        };

        InstrumentSyncResult {
            instrument_code: code,
            outcome,
        }
    }

    async fn persist_history(&self) -> Result<()> {
        let _guard = self.persist_lock.lock().await;
        let snapshot = self.history.snapshot();
        save_json(self.store.as_ref(), store_keys::PRICE_HISTORY, snapshot.as_ref()).await
    }
}

#[async_trait]
impl PriceServiceTrait for PriceService {
    fn load_cache(&self) -> Result<usize> {
        let cached: PriceHistory =
            load_json(self.store.as_ref(), store_keys::PRICE_HISTORY)?.unwrap_or_default();
        let count = cached.len();
        self.history.replace_all(cached);
        info!("Loaded price history for {} instrument(s)", count);
        Ok(count)
    }

    fn snapshot(&self) -> PriceSnapshot {
        let realtime = self
            .realtime
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        PriceSnapshot {
            history: self.history.snapshot(),
            realtime,
        }
    }

    async fn sync_history(&self, codes: &[String]) -> Result<SyncReport> {
        let codes = Self::syncable_codes(codes);
        if codes.is_empty() {
            return Ok(SyncReport::default());
        }
        if !self.provider.capabilities().supports_historical {
            warn!("Provider {} does not serve history; skipping sync", self.provider.id());
            return Ok(SyncReport::default());
        }

        info!("Syncing price history for {} instrument(s)", codes.len());
        let results = join_all(codes.into_iter().map(|code| self.sync_one(code))).await;
        let report = SyncReport { results };

        if report.updated_count() > 0 {
            if let Err(e) = self.persist_history().await {
                error!("Failed to persist price history: {}", e);
                return Err(e);
            }
        }

        info!(
            "Price history sync finished: {} updated, {} failed",
            report.updated_count(),
            report.failures().count()
        );
        Ok(report)
    }

    async fn refresh_realtime(&self, codes: &[String]) -> Result<RealtimeQuotes> {
        let codes = if self.provider.capabilities().supports_realtime {
            Self::syncable_codes(codes)
        } else {
            Vec::new()
        };
        let fetches = codes.iter().map(|code| async move {
            match self.provider.fetch_realtime(code).await {
                Ok(price) if price > Decimal::ZERO => Some((code.clone(), price)),
                Ok(price) => {
                    warn!("Ignoring non-positive realtime quote {} for {}", price, code);
                    None
                }
                Err(e) => {
                    debug!("Realtime quote unavailable for {}: {}", code, e);
                    None
                }
            }
        });

        let quotes: HashMap<String, Decimal> = join_all(fetches).await.into_iter().flatten().collect();
        debug!("Refreshed {} of {} realtime quote(s)", quotes.len(), codes.len());

        let mut guard = self.realtime.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(quotes.clone());
        Ok(quotes)
    }
}
