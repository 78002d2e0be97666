use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use fundpilot_market_data::{MarketDataError, PricePoint, PriceProvider, ProviderCapabilities};

use crate::constants::store_keys;
use crate::errors::{Error, PersistenceError};
use crate::market_data::{PriceService, PriceServiceTrait, SyncOutcome};
use crate::store::{InMemoryStore, KeyValueStoreTrait};

// --- Mock PriceProvider ---
struct MockProvider {
    history: HashMap<String, Vec<PricePoint>>,
    realtime: HashMap<String, Decimal>,
}

impl MockProvider {
    fn new() -> Self {
        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        let mut history = HashMap::new();
        history.insert(
            "110022".to_string(),
            vec![
                PricePoint::new(d(4), dec!(1.80)),
                PricePoint::new(d(5), dec!(1.85)),
            ],
        );
        history.insert("000000".to_string(), Vec::new());

        let mut realtime = HashMap::new();
        realtime.insert("110022".to_string(), dec!(1.87));

        MockProvider { history, realtime }
    }
}

#[async_trait]
impl PriceProvider for MockProvider {
    fn id(&self) -> &'static str {
        "MOCK"
    }

    async fn fetch_history(&self, code: &str) -> Result<Vec<PricePoint>, MarketDataError> {
        if code == "TIMEOUT" {
            return Err(MarketDataError::Timeout {
                provider: "MOCK".to_string(),
            });
        }
        if code == "CASH" {
            panic!("cash must never reach the provider");
        }
        self.history
            .get(code)
            .cloned()
            .ok_or_else(|| MarketDataError::SymbolNotFound(code.to_string()))
    }

    async fn fetch_realtime(&self, code: &str) -> Result<Decimal, MarketDataError> {
        self.realtime
            .get(code)
            .copied()
            .ok_or_else(|| MarketDataError::NoData(code.to_string()))
    }
}

fn codes(list: &[&str]) -> Vec<String> {
    list.iter().map(|c| c.to_string()).collect()
}

#[tokio::test]
async fn test_sync_reports_each_instrument_and_persists() {
    let store = Arc::new(InMemoryStore::new());
    let service = PriceService::new(Arc::new(MockProvider::new()), store.clone());

    let report = service
        .sync_history(&codes(&["110022", "000000", "TIMEOUT", "UNKNOWN", "CASH", "110022"]))
        .await
        .unwrap();

    assert_eq!(report.results.len(), 4);
    assert_eq!(report.updated_count(), 1);
    assert_eq!(report.results[1].outcome, SyncOutcome::NoData);
    assert!(matches!(
        report.results[2].outcome,
        SyncOutcome::Failed { transient: true, .. }
    ));
    assert!(matches!(
        report.results[3].outcome,
        SyncOutcome::Failed { transient: false, .. }
    ));

    let snapshot = service.snapshot();
    assert_eq!(snapshot.series("110022").len(), 2);
    assert!(snapshot.series("000000").is_empty());

    let persisted = store.get(store_keys::PRICE_HISTORY).unwrap().unwrap();
    assert!(persisted.contains("110022"));
}

#[tokio::test]
async fn test_failed_sync_keeps_cached_series() {
    let d = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let cached = serde_json::json!({ "TIMEOUT": [{ "date": d, "nav": 3.0 }] }).to_string();
    let store = Arc::new(InMemoryStore::with_entries([(
        store_keys::PRICE_HISTORY,
        cached.as_str(),
    )]));
    let service = PriceService::new(Arc::new(MockProvider::new()), store);
    assert_eq!(service.load_cache().unwrap(), 1);

    service.sync_history(&codes(&["TIMEOUT"])).await.unwrap();
    assert_eq!(service.snapshot().series("TIMEOUT")[0].nav, dec!(3.0));
}

#[tokio::test]
async fn test_load_cache_reports_malformed_value() {
    let store = Arc::new(InMemoryStore::with_entries([(
        store_keys::PRICE_HISTORY,
        "not json",
    )]));
    let service = PriceService::new(Arc::new(MockProvider::new()), store);
    assert!(matches!(
        service.load_cache(),
        Err(Error::Persistence(PersistenceError::Malformed { .. }))
    ));
    assert!(service.snapshot().history.is_empty());
}

#[tokio::test]
async fn test_snapshot_taken_before_sync_is_unchanged() {
    let service = PriceService::new(Arc::new(MockProvider::new()), Arc::new(InMemoryStore::new()));
    let before = service.snapshot();
    service.sync_history(&codes(&["110022"])).await.unwrap();
    assert!(before.series("110022").is_empty());
    assert_eq!(service.snapshot().series("110022").len(), 2);
}

#[tokio::test]
async fn test_refresh_realtime_omits_failures() {
    let service = PriceService::new(Arc::new(MockProvider::new()), Arc::new(InMemoryStore::new()));
    let quotes = service
        .refresh_realtime(&codes(&["110022", "000000", "CASH"]))
        .await
        .unwrap();

    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes["110022"], dec!(1.87));
    assert_eq!(service.snapshot().realtime_quote("110022"), Some(dec!(1.87)));
    assert_eq!(service.snapshot().realtime_quote("000000"), None);
}

struct HistoryOnly(MockProvider);

#[async_trait]
impl PriceProvider for HistoryOnly {
    fn id(&self) -> &'static str {
        "HISTORY_ONLY"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            supports_historical: true,
            supports_realtime: false,
        }
    }

    async fn fetch_history(&self, code: &str) -> Result<Vec<PricePoint>, MarketDataError> {
        self.0.fetch_history(code).await
    }

    async fn fetch_realtime(&self, _code: &str) -> Result<Decimal, MarketDataError> {
        panic!("realtime must not be requested");
    }
}

#[tokio::test]
async fn test_realtime_skipped_without_capability() {
    let service = PriceService::new(
        Arc::new(HistoryOnly(MockProvider::new())),
        Arc::new(InMemoryStore::new()),
    );
    let quotes = service.refresh_realtime(&codes(&["110022"])).await.unwrap();
    assert!(quotes.is_empty());

    let report = service.sync_history(&codes(&["110022"])).await.unwrap();
    assert_eq!(report.updated_count(), 1);
}
