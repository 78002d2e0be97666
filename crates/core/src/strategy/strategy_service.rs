use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::info;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use crate::errors::{Result, StrategyError};
use crate::market_data::PriceServiceTrait;
use crate::portfolio::holdings::HoldingsCalculator;
use crate::preferences::PreferencesServiceTrait;
use crate::strategy::{
    ConfirmationReceipt, DecisionUpdate, StrategyPlanner, StrategySession,
};
use crate::transactions::LedgerServiceTrait;

#[async_trait]
pub trait StrategyServiceTrait: Send + Sync {
    /// Builds a fresh session, replacing any previous one.
    async fn plan(&self, budget: Option<Decimal>, today: NaiveDate) -> Result<StrategySession>;

    async fn current_session(&self) -> Result<StrategySession>;

    async fn update_decision(&self, index: usize, update: DecisionUpdate) -> Result<StrategySession>;

    async fn remove_decision(&self, index: usize) -> Result<StrategySession>;

    /// Appends the session's decisions to the ledger and ends the session.
    async fn confirm(&self) -> Result<ConfirmationReceipt>;
}

/// Holds the in-memory planning session between edits.
pub struct StrategyService {
    ledger: Arc<dyn LedgerServiceTrait>,
    price_service: Arc<dyn PriceServiceTrait>,
    preferences_service: Arc<dyn PreferencesServiceTrait>,
    session: Mutex<Option<StrategySession>>,
}

impl StrategyService {
    pub fn new(
        ledger: Arc<dyn LedgerServiceTrait>,
        price_service: Arc<dyn PriceServiceTrait>,
        preferences_service: Arc<dyn PreferencesServiceTrait>,
    ) -> Self {
        Self {
            ledger,
            price_service,
            preferences_service,
            session: Mutex::new(None),
        }
    }
}

#[async_trait]
impl StrategyServiceTrait for StrategyService {
    async fn plan(&self, budget: Option<Decimal>, today: NaiveDate) -> Result<StrategySession> {
        let transactions = self.ledger.list_transactions()?;
        let preferences = self.preferences_service.get_preferences()?;
        let prices = self.price_service.snapshot();

        let holdings = HoldingsCalculator::new(&prices).calculate(&transactions);
        let session =
            StrategyPlanner::new(&prices, &preferences).build_session(&holdings, budget, today)?;

        *self.session.lock().await = Some(session.clone());
        Ok(session)
    }

    async fn current_session(&self) -> Result<StrategySession> {
        self.session
            .lock()
            .await
            .clone()
            .ok_or_else(|| StrategyError::NoSession.into())
    }

    async fn update_decision(&self, index: usize, update: DecisionUpdate) -> Result<StrategySession> {
        let prices = self.price_service.snapshot();
        let mut guard = self.session.lock().await;
        let session = guard.as_mut().ok_or(StrategyError::NoSession)?;

        // Edit a copy so a failed update leaves the session untouched.
        let mut edited = session.clone();
        edited.apply_update(index, &update, &prices)?;
        *session = edited;
        Ok(session.clone())
    }

    async fn remove_decision(&self, index: usize) -> Result<StrategySession> {
        let mut guard = self.session.lock().await;
        let session = guard.as_mut().ok_or(StrategyError::NoSession)?;
        session.remove(index)?;
        Ok(session.clone())
    }

    async fn confirm(&self) -> Result<ConfirmationReceipt> {
        let mut guard = self.session.lock().await;
        let session = guard.as_ref().ok_or(StrategyError::NoSession)?;

        let receipt = session.confirm()?;
        let transactions = self
            .ledger
            .append_transactions(receipt.transactions.clone())
            .await?;
        *guard = None;

        info!(
            "Confirmed {} decision(s): cash {}, timing alpha {}",
            transactions.len(),
            receipt.total_cash_amount,
            receipt.total_timing_alpha
        );
        Ok(receipt)
    }
}
