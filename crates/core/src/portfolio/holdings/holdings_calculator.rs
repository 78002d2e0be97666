use std::collections::HashMap;

use log::{debug, warn};
use rust_decimal::Decimal;

use crate::constants::{DECIMAL_PRECISION, LIQUIDATION_EPSILON};
use crate::market_data::{resolve_t_day_price, PriceSnapshot};
use crate::portfolio::holdings::{
    CostBasisStatus, EnhancedTransaction, Holding, PriceResolution, PriceSource,
};
use crate::transactions::{Category, Transaction, TransactionAction};

/// Running totals while walking one instrument's transactions.
#[derive(Debug, Default)]
struct PositionState {
    units: Decimal,
    cash_cost: Decimal,
    has_unresolved: bool,
    has_stale: bool,
}

impl PositionState {
    fn acquire(&mut self, units: Decimal, executed_value: Option<Decimal>) {
        match executed_value {
            Some(value) => self.cash_cost += value,
            None => self.has_unresolved = true,
        }
        self.units += units;
    }

    /// Proportional cost removal; a sell of the whole position zeroes the cost.
    fn dispose(&mut self, units: Decimal) {
        if self.units > Decimal::ZERO {
            if units >= self.units {
                self.cash_cost = Decimal::ZERO;
            } else {
                let removed = units / self.units * self.cash_cost;
                self.cash_cost = (self.cash_cost - removed).max(Decimal::ZERO);
            }
        }
        self.units -= units;

        // A closed position starts over with a clean slate.
        if self.units <= LIQUIDATION_EPSILON {
            self.cash_cost = Decimal::ZERO;
            self.has_unresolved = false;
            self.has_stale = false;
        }
    }
}

/// Folds the ledger and a price snapshot into one [`Holding`] per instrument.
///
/// Pure: the same ledger and snapshot always yield the same holdings.
pub struct HoldingsCalculator<'a> {
    prices: &'a PriceSnapshot,
}

impl<'a> HoldingsCalculator<'a> {
    pub fn new(prices: &'a PriceSnapshot) -> Self {
        Self { prices }
    }

    /// Aggregates every instrument in the ledger.
    ///
    /// Active holdings come first, then by market value descending, then by code.
    pub fn calculate(&self, transactions: &[Transaction]) -> Vec<Holding> {
        let mut order: Vec<&str> = Vec::new();
        let mut groups: HashMap<&str, Vec<&Transaction>> = HashMap::new();
        for tx in transactions {
            let code = tx.instrument_code.as_str();
            groups
                .entry(code)
                .or_insert_with(|| {
                    order.push(code);
                    Vec::new()
                })
                .push(tx);
        }

        let mut holdings: Vec<Holding> = order
            .into_iter()
            .filter_map(|code| groups.remove(code))
            .map(|group| self.calculate_holding(group))
            .collect();

        holdings.sort_by(|a, b| {
            a.is_liquidated
                .cmp(&b.is_liquidated)
                .then_with(|| b.market_value_or_zero().cmp(&a.market_value_or_zero()))
                .then_with(|| a.instrument_code.cmp(&b.instrument_code))
        });

        debug!(
            "Aggregated {} transactions into {} holdings",
            transactions.len(),
            holdings.len()
        );
        holdings
    }

    /// Aggregates one instrument's transactions (all sharing a code).
    fn calculate_holding(&self, mut group: Vec<&Transaction>) -> Holding {
        let first = group[0];
        let code = first.instrument_code.clone();
        let category = first.category;

        // Stable: equal dates keep insertion order.
        group.sort_by_key(|tx| tx.settlement_date);

        let mut state = PositionState::default();
        let mut enhanced = Vec::with_capacity(group.len());

        for tx in group {
            let (resolution, executed_price) = self.resolve_executed_price(tx, category);
            let executed_value = match (tx.recorded_cash_amount, executed_price) {
                (Some(amount), _) => Some(amount),
                (None, Some(price)) => Some(tx.units() * price),
                (None, None) => None,
            };

            match tx.action {
                TransactionAction::Buy { units } | TransactionAction::Reinvest { units } => {
                    if resolution.is_stale() {
                        state.has_stale = true;
                    }
                    if executed_value.is_none() {
                        warn!(
                            "No price for {} on {}; cost basis pending price sync",
                            code, tx.settlement_date
                        );
                    }
                    state.acquire(units, executed_value);
                }
                TransactionAction::Sell { units } => state.dispose(units),
            }

            enhanced.push(EnhancedTransaction {
                transaction: tx.clone(),
                executed_price,
                executed_value,
                is_price_stale: resolution.is_stale(),
                price_resolution: resolution,
            });
        }

        let is_liquidated = state.units <= LIQUIDATION_EPSILON;
        let cost_basis_status = if state.has_unresolved {
            CostBasisStatus::Pending
        } else if state.has_stale {
            CostBasisStatus::Provisional
        } else {
            CostBasisStatus::Confirmed
        };

        let weighted_average_cost = if is_liquidated {
            Some(Decimal::ZERO)
        } else if cost_basis_status == CostBasisStatus::Pending {
            None
        } else {
            Some((state.cash_cost / state.units).round_dp(DECIMAL_PRECISION))
        };

        let cost_value = if is_liquidated {
            Some(Decimal::ZERO)
        } else if cost_basis_status == CostBasisStatus::Pending {
            None
        } else {
            Some(state.cash_cost)
        };

        let (current_price, price_source) = self.current_price(&code, category);
        let market_value = current_price.map(|price| state.units * price);
        let unrealized_gain = match (market_value, cost_value) {
            (Some(market), Some(cost)) if !is_liquidated => Some(market - cost),
            (Some(_), Some(_)) => Some(Decimal::ZERO),
            _ => None,
        };

        Holding {
            instrument_code: code,
            display_name: first.display_name.clone(),
            category,
            total_units: state.units,
            weighted_average_cost,
            cost_basis_status,
            is_liquidated,
            current_price,
            price_source,
            market_value,
            cost_value,
            unrealized_gain,
            transactions: enhanced,
        }
    }

    /// Executed price for a transaction, in priority order: recorded cash
    /// amount, cash parity, then the T-day close from the cached series.
    pub fn resolve_executed_price(
        &self,
        tx: &Transaction,
        category: Category,
    ) -> (PriceResolution, Option<Decimal>) {
        if let Some(amount) = tx.recorded_cash_amount {
            return (PriceResolution::RecordedAmount, amount.checked_div(tx.units()));
        }

        if category == Category::Cash {
            return (PriceResolution::CashParity, Some(Decimal::ONE));
        }

        match resolve_t_day_price(self.prices.series(&tx.instrument_code), tx.settlement_date) {
            Some(price) => (PriceResolution::from(price), Some(price.nav)),
            None => (PriceResolution::Unresolved, None),
        }
    }

    fn current_price(&self, code: &str, category: Category) -> (Option<Decimal>, PriceSource) {
        if category == Category::Cash {
            return (Some(Decimal::ONE), PriceSource::Fixed);
        }
        if let Some(quote) = self.prices.realtime_quote(code) {
            return (Some(quote), PriceSource::Realtime);
        }
        match self.prices.series(code).last() {
            Some(point) => (Some(point.nav), PriceSource::History),
            None => (None, PriceSource::Unavailable),
        }
    }
}
