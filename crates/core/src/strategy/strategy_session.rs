use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::strategy_planner::{suggested_budget, timing_gap, timing_signal, units_for};
use crate::errors::{Result, StrategyError, ValidationError};
use crate::market_data::{resolve_t_day_price, PriceSnapshot, TDayMatch};
use crate::portfolio::holdings::PriceResolution;
use crate::strategy::{ConfirmationReceipt, DecisionUpdate, StrategyDecision, StrategySession};
use crate::transactions::{Category, Transaction, TransactionAction};
use crate::utils::decimal_utils::round_amount;

fn require_positive(value: Decimal, field: &str) -> Result<()> {
    if value <= Decimal::ZERO {
        return Err(ValidationError::InvalidInput(format!(
            "{} must be positive, got {}",
            field, value
        ))
        .into());
    }
    Ok(())
}

impl StrategySession {
    fn decision_mut(&mut self, index: usize) -> Result<&mut StrategyDecision> {
        let len = self.decisions.len();
        self.decisions
            .get_mut(index)
            .ok_or_else(|| StrategyError::DecisionOutOfRange { index, len }.into())
    }

    fn refresh_signal(&mut self) {
        self.signal = timing_signal(&self.decisions);
        self.suggested_budget = suggested_budget(self.signal, &self.budget_options);
    }

    /// Pins the settlement units of one decision.
    pub fn override_units(&mut self, index: usize, units: Decimal) -> Result<()> {
        require_positive(units, "Units")?;
        let decision = self.decision_mut(index)?;
        decision.settlement_units = units;
        decision.units_overridden = true;
        Ok(())
    }

    /// Moves a decision to another settlement date.
    ///
    /// The current price is re-resolved with the T-day rule (cash stays at
    /// 1.0) and units are recomputed from the cash amount, dropping any
    /// units override. A date past the cached history keeps the latest point
    /// and flags the price as stale; an instrument without history fails
    /// with [`StrategyError::PriceUnavailable`].
    pub fn override_settlement_date(
        &mut self,
        index: usize,
        date: NaiveDate,
        prices: &PriceSnapshot,
    ) -> Result<()> {
        let decision = self.decision_mut(index)?;
        if decision.category != Category::Cash {
            let price = resolve_t_day_price(prices.series(&decision.instrument_code), date)
                .ok_or_else(|| StrategyError::PriceUnavailable(decision.instrument_code.clone()))?;
            if price.matched == TDayMatch::Stale {
                warn!(
                    "Settlement date {} for {} is past cached history; using {}",
                    date, decision.instrument_code, price.date
                );
            }
            decision.current_price = price.nav;
            decision.price_resolution = PriceResolution::from(price);
            decision.is_price_stale = decision.price_resolution.is_stale();
        }

        let units = units_for(decision.cash_amount, decision.current_price)
            .ok_or_else(|| StrategyError::PriceUnavailable(decision.instrument_code.clone()))?;
        decision.settlement_date = date;
        decision.settlement_units = units;
        decision.units_overridden = false;
        decision.timing_gap = timing_gap(decision.reference_baseline_price, decision.current_price);

        self.refresh_signal();
        Ok(())
    }

    /// Changes the cash amount; units follow unless they were pinned.
    pub fn override_cash_amount(&mut self, index: usize, amount: Decimal) -> Result<()> {
        require_positive(amount, "Cash amount")?;
        let amount = round_amount(amount);
        let decision = self.decision_mut(index)?;
        decision.cash_amount = amount;
        if !decision.units_overridden {
            decision.settlement_units = units_for(amount, decision.current_price)
                .ok_or_else(|| StrategyError::PriceUnavailable(decision.instrument_code.clone()))?;
        }
        Ok(())
    }

    /// Applies a partial edit: date first, then cash amount, then units.
    pub fn apply_update(
        &mut self,
        index: usize,
        update: &DecisionUpdate,
        prices: &PriceSnapshot,
    ) -> Result<()> {
        self.decision_mut(index)?;
        if let Some(date) = update.settlement_date {
            self.override_settlement_date(index, date, prices)?;
        }
        if let Some(amount) = update.cash_amount {
            self.override_cash_amount(index, amount)?;
        }
        if let Some(units) = update.units {
            self.override_units(index, units)?;
        }
        Ok(())
    }

    /// Drops a decision from the session.
    pub fn remove(&mut self, index: usize) -> Result<StrategyDecision> {
        self.decision_mut(index)?;
        let removed = self.decisions.remove(index);
        self.refresh_signal();
        Ok(removed)
    }

    /// Converts every decision into a buy with the cash amount recorded and
    /// `baseline × units − cash amount` as timing alpha.
    pub fn confirm(&self) -> Result<ConfirmationReceipt> {
        if self.decisions.is_empty() {
            return Err(StrategyError::EmptySession.into());
        }

        let mut transactions = Vec::with_capacity(self.decisions.len());
        let mut total_cash_amount = Decimal::ZERO;
        let mut total_timing_alpha = Decimal::ZERO;

        for decision in &self.decisions {
            if decision.settlement_units <= Decimal::ZERO || decision.cash_amount <= Decimal::ZERO {
                return Err(ValidationError::InvalidInput(format!(
                    "Decision for {} has no units or cash to settle",
                    decision.instrument_code
                ))
                .into());
            }

            let timing_alpha = round_amount(
                decision.reference_baseline_price * decision.settlement_units - decision.cash_amount,
            );
            total_cash_amount += decision.cash_amount;
            total_timing_alpha += timing_alpha;

            transactions.push(Transaction {
                id: Uuid::new_v4().to_string(),
                instrument_code: decision.instrument_code.clone(),
                display_name: decision.display_name.clone(),
                category: decision.category,
                action: TransactionAction::Buy {
                    units: decision.settlement_units,
                },
                recorded_cash_amount: Some(decision.cash_amount),
                settlement_date: decision.settlement_date,
                timing_alpha: Some(timing_alpha),
            });
        }

        Ok(ConfirmationReceipt {
            transactions,
            total_cash_amount,
            total_timing_alpha,
        })
    }
}
