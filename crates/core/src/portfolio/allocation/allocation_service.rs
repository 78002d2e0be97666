use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::market_data::{monday_baseline, PriceHistory};
use crate::portfolio::allocation::{
    CategoryAllocation, CategoryWeeklyGain, PortfolioSummary, WeeklyPerformance,
};
use crate::portfolio::holdings::{CostBasisStatus, Holding};
use crate::transactions::{Category, TransactionAction};
use crate::utils::decimal_utils::percent_of;
use crate::utils::time_utils::monday_of_week;

/// Market value per category over active holdings with a known price.
/// All four categories are always present.
pub fn category_values(holdings: &[Holding]) -> BTreeMap<Category, Decimal> {
    let mut values: BTreeMap<Category, Decimal> =
        Category::ALL.iter().map(|c| (*c, Decimal::ZERO)).collect();

    for holding in holdings.iter().filter(|h| h.is_active()) {
        if let Some(price) = holding.current_price {
            *values.entry(holding.category).or_insert(Decimal::ZERO) += holding.total_units * price;
        }
    }
    values
}

/// Totals, category percentages and cost-basis flags.
pub fn summarize_portfolio(holdings: &[Holding]) -> PortfolioSummary {
    let values = category_values(holdings);
    let total_market_value: Decimal = values.values().copied().sum();

    let categories = values
        .iter()
        .map(|(category, value)| CategoryAllocation {
            category: *category,
            value: *value,
            percentage: percent_of(*value, total_market_value),
        })
        .collect();

    let active = || holdings.iter().filter(|h| h.is_active());
    let total_cost_value: Decimal = active().filter_map(|h| h.cost_value).sum();
    let unrealized_gain: Decimal = active().filter_map(|h| h.unrealized_gain).sum();

    PortfolioSummary {
        total_market_value,
        total_cost_value,
        unrealized_gain,
        categories,
        has_pending_cost_basis: active().any(|h| h.cost_basis_status == CostBasisStatus::Pending),
        has_provisional_cost_basis: active()
            .any(|h| h.cost_basis_status == CostBasisStatus::Provisional),
    }
}

/// Gain since this week's Monday.
///
/// Priced holdings gain `units × (current − Monday baseline)`. Cash gains
/// the dividends reinvested since Monday (recorded amount, else units).
pub fn weekly_performance(
    holdings: &[Holding],
    history: &PriceHistory,
    today: NaiveDate,
) -> WeeklyPerformance {
    let week_start = monday_of_week(today);
    let mut gains: BTreeMap<Category, Decimal> =
        Category::ALL.iter().map(|c| (*c, Decimal::ZERO)).collect();

    for holding in holdings {
        let gain = if holding.category == Category::Cash {
            holding
                .transactions
                .iter()
                .map(|et| &et.transaction)
                .filter(|tx| tx.settlement_date >= week_start)
                .filter_map(|tx| match tx.action {
                    TransactionAction::Reinvest { units } => {
                        Some(tx.recorded_cash_amount.unwrap_or(units))
                    }
                    _ => None,
                })
                .sum()
        } else if holding.is_active() {
            let series = history
                .get(&holding.instrument_code)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            match (holding.current_price, monday_baseline(series, today)) {
                (Some(current), Some(baseline)) => holding.total_units * (current - baseline),
                _ => Decimal::ZERO,
            }
        } else {
            Decimal::ZERO
        };

        *gains.entry(holding.category).or_insert(Decimal::ZERO) += gain;
    }

    let total_gain: Decimal = gains.values().copied().sum();
    let mut categories: Vec<CategoryWeeklyGain> = gains
        .into_iter()
        .map(|(category, gain)| CategoryWeeklyGain { category, gain })
        .collect();
    // Stable: equal gains keep category order.
    categories.sort_by(|a, b| b.gain.cmp(&a.gain));

    WeeklyPerformance {
        week_start,
        total_gain,
        categories,
    }
}
