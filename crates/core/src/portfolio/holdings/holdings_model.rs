use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::market_data::{TDayMatch, TDayPrice};
use crate::transactions::{Category, Transaction};

/// Confidence in a holding's weighted-average cost.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CostBasisStatus {
    /// Every acquisition was priced from a recorded amount or a T-day close.
    Confirmed,
    /// At least one acquisition used the latest cached price past the cached window.
    Provisional,
    /// At least one acquisition has no price yet; cost basis is not reported.
    Pending,
}

/// Where a holding's current price came from.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PriceSource {
    /// Cash is always worth 1.0 per unit.
    Fixed,
    /// Latest cached history point.
    History,
    /// Intraday valuation estimate.
    Realtime,
    /// No price data for the instrument.
    Unavailable,
}

/// How a price was determined for one transaction or planned decision.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PriceResolution {
    RecordedAmount,
    CashParity,
    /// Intraday valuation estimate; planned decisions only.
    Realtime,
    TDay { date: NaiveDate },
    FirstAvailable { date: NaiveDate },
    Stale { date: NaiveDate },
    Unresolved,
}

impl From<TDayPrice> for PriceResolution {
    fn from(price: TDayPrice) -> Self {
        match price.matched {
            TDayMatch::Preceding => PriceResolution::TDay { date: price.date },
            TDayMatch::FirstAvailable => PriceResolution::FirstAvailable { date: price.date },
            TDayMatch::Stale => PriceResolution::Stale { date: price.date },
        }
    }
}

impl PriceResolution {
    pub fn is_stale(&self) -> bool {
        matches!(self, PriceResolution::Stale { .. })
    }
}

/// A ledger entry annotated with its resolved execution price.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub executed_price: Option<Decimal>,
    pub executed_value: Option<Decimal>,
    pub price_resolution: PriceResolution,
    pub is_price_stale: bool,
}

/// Aggregated position in one instrument. Derived from the ledger and a
/// price snapshot; never persisted.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub instrument_code: String,
    pub display_name: String,
    pub category: Category,

    pub total_units: Decimal,
    /// `None` while the cost basis is pending a price sync.
    pub weighted_average_cost: Option<Decimal>,
    pub cost_basis_status: CostBasisStatus,
    pub is_liquidated: bool,

    pub current_price: Option<Decimal>,
    pub price_source: PriceSource,

    pub market_value: Option<Decimal>,
    pub cost_value: Option<Decimal>,
    pub unrealized_gain: Option<Decimal>,

    pub transactions: Vec<EnhancedTransaction>,
}

impl Holding {
    pub fn is_active(&self) -> bool {
        !self.is_liquidated
    }

    /// Market value, or zero when the instrument has no price.
    pub fn market_value_or_zero(&self) -> Decimal {
        self.market_value.unwrap_or(Decimal::ZERO)
    }
}
