//! Allocation models for the four-category breakdown.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transactions::Category;

/// Value held in a single category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAllocation {
    pub category: Category,
    /// Market value of active holdings with a known price
    pub value: Decimal,
    /// Percentage of total portfolio (0-100)
    pub percentage: Decimal,
}

/// Portfolio totals plus the category breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_market_value: Decimal,
    /// Remaining cost of active holdings whose cost basis is known
    pub total_cost_value: Decimal,
    pub unrealized_gain: Decimal,
    /// One entry per category, in category order
    pub categories: Vec<CategoryAllocation>,
    pub has_pending_cost_basis: bool,
    pub has_provisional_cost_basis: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWeeklyGain {
    pub category: Category,
    pub gain: Decimal,
}

/// Gain since the start of the current week.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPerformance {
    pub week_start: NaiveDate,
    pub total_gain: Decimal,
    /// Sorted by gain descending
    pub categories: Vec<CategoryWeeklyGain>,
}
