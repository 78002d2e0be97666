use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;

use crate::constants::STRONG_SIGNAL_THRESHOLD;
use crate::errors::Result;
use crate::market_data::{latest_point, monday_baseline, PriceSnapshot};
use crate::portfolio::allocation::category_values;
use crate::portfolio::holdings::{Holding, PriceResolution};
use crate::portfolio::rebalance::{allocate_by_category_gap, representative_holdings};
use crate::preferences::StrategyPreferences;
use crate::strategy::{BudgetOptions, StrategyDecision, StrategySession, TimingSignal};
use crate::transactions::Category;
use crate::utils::decimal_utils::round_units;

/// Builds deployment sessions from holdings and a price snapshot.
pub struct StrategyPlanner<'a> {
    prices: &'a PriceSnapshot,
    preferences: &'a StrategyPreferences,
}

impl<'a> StrategyPlanner<'a> {
    pub fn new(prices: &'a PriceSnapshot, preferences: &'a StrategyPreferences) -> Self {
        Self {
            prices,
            preferences,
        }
    }

    /// Runs category gap allocation over `holdings` and turns every non-zero
    /// deployment into a decision on that category's representative holding.
    /// Without an explicit budget the preferred default budget is used.
    pub fn build_session(
        &self,
        holdings: &[Holding],
        budget: Option<Decimal>,
        today: NaiveDate,
    ) -> Result<StrategySession> {
        let budget = budget.unwrap_or(self.preferences.default_budget);
        let values = category_values(holdings);
        let representatives =
            representative_holdings(holdings, &self.preferences.preferred_instruments);
        let eligible: Vec<Category> = representatives.keys().copied().collect();

        let plan = allocate_by_category_gap(&values, &eligible, budget)?;
        let mut undeployed = plan.undeployed;

        let mut decisions = Vec::with_capacity(plan.deployments.len());
        for deployment in &plan.deployments {
            let Some(holding) = representatives.get(&deployment.category) else {
                continue;
            };
            match self.build_decision(holding, deployment.amount, today) {
                Some(decision) => decisions.push(decision),
                None => {
                    warn!(
                        "No usable price for {}; {} left undeployed",
                        holding.instrument_code, deployment.amount
                    );
                    undeployed += deployment.amount;
                }
            }
        }

        let signal = timing_signal(&decisions);
        let budget_options = BudgetOptions {
            default_budget: self.preferences.default_budget,
            boosted_budget: self.preferences.boosted_budget,
        };
        debug!(
            "Planned {} decision(s) for budget {} (signal {:?})",
            decisions.len(),
            plan.budget,
            signal
        );

        Ok(StrategySession {
            planned_for: today,
            budget: plan.budget,
            total_value: plan.total_value,
            target_value: plan.target_value,
            undeployed,
            signal,
            suggested_budget: suggested_budget(signal, &budget_options),
            budget_options,
            decisions,
        })
    }

    fn build_decision(
        &self,
        holding: &Holding,
        amount: Decimal,
        today: NaiveDate,
    ) -> Option<StrategyDecision> {
        let (baseline, current, resolution) = if holding.category == Category::Cash {
            (Decimal::ONE, Decimal::ONE, PriceResolution::CashParity)
        } else {
            let series = self.prices.series(&holding.instrument_code);
            let baseline = monday_baseline(series, today);
            let (current, resolution) = match self.prices.realtime_quote(&holding.instrument_code) {
                Some(quote) => (quote, PriceResolution::Realtime),
                None => {
                    let latest = latest_point(series)?;
                    let resolution = if latest.date < today {
                        PriceResolution::Stale { date: latest.date }
                    } else {
                        PriceResolution::TDay { date: latest.date }
                    };
                    (latest.nav, resolution)
                }
            };
            (baseline.unwrap_or(current), current, resolution)
        };

        let settlement_units = units_for(amount, current)?;
        Some(StrategyDecision {
            instrument_code: holding.instrument_code.clone(),
            display_name: holding.display_name.clone(),
            category: holding.category,
            suggested_cash_amount: amount,
            cash_amount: amount,
            settlement_units,
            settlement_date: today,
            reference_baseline_price: baseline,
            current_price: current,
            price_resolution: resolution,
            is_price_stale: resolution.is_stale(),
            timing_gap: timing_gap(baseline, current),
            units_overridden: false,
        })
    }
}

/// `amount / price` at settlement precision; `None` for a non-positive price.
pub(crate) fn units_for(amount: Decimal, price: Decimal) -> Option<Decimal> {
    if price <= Decimal::ZERO {
        return None;
    }
    Some(round_units(amount / price))
}

pub(crate) fn timing_gap(baseline: Decimal, current: Decimal) -> Decimal {
    if baseline.is_zero() {
        return Decimal::ZERO;
    }
    (current - baseline) / baseline
}

/// Signal from the equity and gold decisions' timing gaps.
pub fn timing_signal(decisions: &[StrategyDecision]) -> TimingSignal {
    let gap_of = |category: Category| {
        decisions
            .iter()
            .find(|d| d.category == category)
            .map(|d| d.timing_gap)
            .unwrap_or(Decimal::ZERO)
    };
    let equity = gap_of(Category::Equity);
    let gold = gap_of(Category::Gold);

    if equity <= STRONG_SIGNAL_THRESHOLD || gold <= STRONG_SIGNAL_THRESHOLD {
        TimingSignal::Strong
    } else if equity < Decimal::ZERO || gold < Decimal::ZERO {
        TimingSignal::Favorable
    } else {
        TimingSignal::Elevated
    }
}

pub(crate) fn suggested_budget(signal: TimingSignal, options: &BudgetOptions) -> Decimal {
    match signal {
        TimingSignal::Strong => options.boosted_budget,
        _ => options.default_budget,
    }
}
