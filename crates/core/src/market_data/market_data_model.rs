use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fundpilot_market_data::PricePoint;

/// Instrument code -> ascending price series.
pub type PriceHistory = HashMap<String, Vec<PricePoint>>;

/// Instrument code -> intraday valuation estimate.
pub type RealtimeQuotes = HashMap<String, Decimal>;

/// Immutable view of the price data used for one aggregation pass.
#[derive(Debug, Clone, Default)]
pub struct PriceSnapshot {
    pub history: Arc<PriceHistory>,
    pub realtime: Arc<RealtimeQuotes>,
}

impl PriceSnapshot {
    pub fn new(history: PriceHistory, realtime: RealtimeQuotes) -> Self {
        Self {
            history: Arc::new(history),
            realtime: Arc::new(realtime),
        }
    }

    /// Cached series for `code`; empty when nothing is cached.
    pub fn series(&self, code: &str) -> &[PricePoint] {
        self.history.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn realtime_quote(&self, code: &str) -> Option<Decimal> {
        self.realtime.get(code).copied()
    }
}

/// Result of syncing one instrument's history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SyncOutcome {
    /// Cache entry replaced with a fresh series.
    #[serde(rename_all = "camelCase")]
    Updated {
        points: usize,
        latest_date: Option<NaiveDate>,
    },
    /// Provider returned an empty series; cached data kept.
    NoData,
    /// Provider call failed; cached data kept.
    #[serde(rename_all = "camelCase")]
    Failed { message: String, transient: bool },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentSyncResult {
    pub instrument_code: String,
    #[serde(flatten)]
    pub outcome: SyncOutcome,
}

/// Per-instrument report of a history sync batch.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub results: Vec<InstrumentSyncResult>,
}

impl SyncReport {
    pub fn updated_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, SyncOutcome::Updated { .. }))
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &InstrumentSyncResult> {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, SyncOutcome::Failed { .. }))
    }
}
