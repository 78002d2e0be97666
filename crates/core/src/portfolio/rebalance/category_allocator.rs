use std::collections::BTreeMap;

use log::debug;
use rust_decimal::Decimal;

use crate::constants::{AMOUNT_DECIMAL_PRECISION, CATEGORY_COUNT};
use crate::errors::{Result, ValidationError};
use crate::portfolio::holdings::Holding;
use crate::portfolio::rebalance::{CategoryAllocationPlan, CategoryDeployment};
use crate::transactions::Category;
use crate::utils::decimal_utils::{apportion_cents, round_amount};

/// Splits `budget` across categories, largest shortfall first.
///
/// Each category's gap is `max(0, (total + budget) / 4 − value)`. Gaps are
/// filled greedily in descending order (ties keep category order) and
/// categories not in `eligible` are skipped. Budget left once every gap is
/// filled goes to the first deployment, or to the first eligible category
/// when no gap was open. Amounts are floored to cents; the missing cents go
/// to categories that can take one without passing their gap and the rest
/// to the first deployment. Deployments that round to nothing are dropped,
/// so every deployment is positive and deployments plus `undeployed` always
/// equal the budget.
pub fn allocate_by_category_gap(
    values: &BTreeMap<Category, Decimal>,
    eligible: &[Category],
    budget: Decimal,
) -> Result<CategoryAllocationPlan> {
    let budget = round_amount(budget);
    if budget <= Decimal::ZERO {
        return Err(ValidationError::InvalidInput(format!(
            "Budget must be positive, got {}",
            budget
        ))
        .into());
    }

    let value_of = |category: Category| values.get(&category).copied().unwrap_or(Decimal::ZERO);
    let total_value: Decimal = Category::ALL.iter().map(|c| value_of(*c)).sum();
    let target_value = (total_value + budget) / Decimal::from(CATEGORY_COUNT);

    let mut gaps: Vec<(Category, Decimal)> = Category::ALL
        .iter()
        .map(|c| (*c, (target_value - value_of(*c)).max(Decimal::ZERO)))
        .collect();
    gaps.sort_by(|a, b| b.1.cmp(&a.1));

    let mut remaining = budget;
    let mut deployments: Vec<CategoryDeployment> = Vec::new();
    for (category, gap) in &gaps {
        if remaining <= Decimal::ZERO {
            break;
        }
        if !eligible.contains(category) {
            debug!("Skipping {} (gap {}): no eligible instrument", category, gap);
            continue;
        }
        let amount = remaining.min(*gap);
        if amount > Decimal::ZERO {
            deployments.push(CategoryDeployment {
                category: *category,
                current_value: value_of(*category),
                gap: *gap,
                amount,
            });
            remaining -= amount;
        }
    }

    if remaining > Decimal::ZERO {
        if let Some(first) = deployments.first_mut() {
            first.amount += remaining;
            remaining = Decimal::ZERO;
        } else if let Some((category, gap)) = gaps.iter().find(|(c, _)| eligible.contains(c)) {
            deployments.push(CategoryDeployment {
                category: *category,
                current_value: value_of(*category),
                gap: *gap,
                amount: remaining,
            });
            remaining = Decimal::ZERO;
        }
    }

    let undeployed = remaining;
    let deployed = budget - undeployed;
    let raw: Vec<Decimal> = deployments.iter().map(|d| d.amount).collect();
    let caps: Vec<Decimal> = deployments.iter().map(|d| d.gap).collect();
    let cent = Decimal::new(1, AMOUNT_DECIMAL_PRECISION);
    let amounts = apportion_cents(&raw, deployed, 0, |idx, floored| floored + cent <= caps[idx]);
    for (deployment, amount) in deployments.iter_mut().zip(amounts) {
        deployment.amount = amount;
    }
    deployments.retain(|d| d.amount > Decimal::ZERO);

    Ok(CategoryAllocationPlan {
        budget,
        total_value,
        target_value,
        deployments,
        undeployed,
    })
}

/// One holding per category to receive that category's deployment.
///
/// The preferred instrument wins when it is an active, priced holding in
/// that category; otherwise the active priced holding with the most units.
pub fn representative_holdings<'a>(
    holdings: &'a [Holding],
    preferred: &BTreeMap<Category, String>,
) -> BTreeMap<Category, &'a Holding> {
    let mut chosen: BTreeMap<Category, &'a Holding> = BTreeMap::new();
    let candidates = holdings
        .iter()
        .filter(|h| h.is_active() && h.current_price.is_some());

    for holding in candidates {
        let is_preferred = preferred
            .get(&holding.category)
            .is_some_and(|code| code == &holding.instrument_code);

        match chosen.get(&holding.category) {
            None => {
                chosen.insert(holding.category, holding);
            }
            Some(current) => {
                let current_preferred = preferred
                    .get(&current.category)
                    .is_some_and(|code| code == &current.instrument_code);
                if is_preferred || (!current_preferred && holding.total_units > current.total_units)
                {
                    chosen.insert(holding.category, holding);
                }
            }
        }
    }
    chosen
}
