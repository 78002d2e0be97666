use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{BOOSTED_BUDGET, DEFAULT_BUDGET};
use crate::errors::{Result, ValidationError};
use crate::transactions::Category;

/// User preferences for weekly deployment planning.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StrategyPreferences {
    /// Instrument to receive each category's deployment
    #[serde(default)]
    pub preferred_instruments: BTreeMap<Category, String>,
    #[serde(default = "default_budget")]
    pub default_budget: Decimal,
    /// Budget suggested when the timing signal is strong
    #[serde(default = "boosted_budget")]
    pub boosted_budget: Decimal,
}

fn default_budget() -> Decimal {
    DEFAULT_BUDGET
}

fn boosted_budget() -> Decimal {
    BOOSTED_BUDGET
}

impl Default for StrategyPreferences {
    fn default() -> Self {
        Self {
            preferred_instruments: BTreeMap::new(),
            default_budget: DEFAULT_BUDGET,
            boosted_budget: BOOSTED_BUDGET,
        }
    }
}

impl StrategyPreferences {
    pub fn validate(&self) -> Result<()> {
        if self.default_budget <= Decimal::ZERO || self.boosted_budget <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(
                "Budgets must be positive".to_string(),
            )
            .into());
        }
        if let Some((category, _)) = self
            .preferred_instruments
            .iter()
            .find(|(_, code)| code.trim().is_empty())
        {
            return Err(ValidationError::InvalidInput(format!(
                "Preferred instrument for {} is empty",
                category
            ))
            .into());
        }
        Ok(())
    }
}
