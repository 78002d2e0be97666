use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::portfolio::holdings::PriceResolution;
use crate::transactions::{Category, Transaction};

/// Market timing read from the equity and gold decisions.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TimingSignal {
    /// Equity or gold is down at least 1.5% on the week.
    Strong,
    /// Equity or gold is below its Monday baseline.
    Favorable,
    /// Neither is below its baseline.
    Elevated,
}

/// One planned deployment, editable until confirmed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StrategyDecision {
    pub instrument_code: String,
    pub display_name: String,
    pub category: Category,
    pub suggested_cash_amount: Decimal,
    pub cash_amount: Decimal,
    pub settlement_units: Decimal,
    pub settlement_date: NaiveDate,
    pub reference_baseline_price: Decimal,
    pub current_price: Decimal,
    /// Where `current_price` came from.
    pub price_resolution: PriceResolution,
    pub is_price_stale: bool,
    /// `(current − baseline) / baseline`
    pub timing_gap: Decimal,
    pub units_overridden: bool,
}

/// Budgets the session chooses between when suggesting the next budget.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetOptions {
    pub default_budget: Decimal,
    pub boosted_budget: Decimal,
}

/// A planning session: the decisions plus the allocation context they came from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StrategySession {
    pub planned_for: NaiveDate,
    pub budget: Decimal,
    pub total_value: Decimal,
    pub target_value: Decimal,
    pub undeployed: Decimal,
    pub signal: TimingSignal,
    pub suggested_budget: Decimal,
    pub budget_options: BudgetOptions,
    pub decisions: Vec<StrategyDecision>,
}

/// Partial edit of one decision.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DecisionUpdate {
    #[serde(default)]
    pub settlement_date: Option<NaiveDate>,
    #[serde(default)]
    pub cash_amount: Option<Decimal>,
    #[serde(default)]
    pub units: Option<Decimal>,
}

/// Result of confirming a session into the ledger.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationReceipt {
    pub transactions: Vec<Transaction>,
    pub total_cash_amount: Decimal,
    pub total_timing_alpha: Decimal,
}
