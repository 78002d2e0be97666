use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transactions::Category;

/// Cash assigned to one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDeployment {
    pub category: Category,
    pub current_value: Decimal,
    pub gap: Decimal,
    pub amount: Decimal,
}

/// Output of category-level gap allocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAllocationPlan {
    pub budget: Decimal,
    pub total_value: Decimal,
    /// Equal-weight target per category after deploying the budget
    pub target_value: Decimal,
    /// In processing order (largest gap first)
    pub deployments: Vec<CategoryDeployment>,
    /// Budget left over because no category could receive it
    pub undeployed: Decimal,
}

/// Current value of one instrument within a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentValue {
    pub instrument_code: String,
    pub display_name: String,
    pub current_value: Decimal,
    pub current_price: Option<Decimal>,
}

/// Top-up assigned to one instrument.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentTopUp {
    pub instrument_code: String,
    pub display_name: String,
    pub current_value: Decimal,
    pub amount: Decimal,
    /// `amount / current price`, when the price is known
    pub suggested_units: Option<Decimal>,
    /// Already above the blended target; receives nothing
    pub excluded: bool,
}

/// Output of instrument-level equalization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EqualizationPlan {
    pub inflow: Decimal,
    pub target_per_instrument: Decimal,
    /// In input order
    pub top_ups: Vec<InstrumentTopUp>,
    /// Inflow left over because there was no instrument to receive it
    pub undeployed: Decimal,
}
