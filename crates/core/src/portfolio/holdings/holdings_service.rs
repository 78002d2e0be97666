use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;

use crate::errors::Result;
use crate::market_data::{PriceServiceTrait, RealtimeQuotes, SyncReport};
use crate::portfolio::allocation::{
    summarize_portfolio, weekly_performance, PortfolioSummary, WeeklyPerformance,
};
use crate::portfolio::holdings::{Holding, HoldingsCalculator};
use crate::transactions::{instrument_codes, Category, LedgerServiceTrait};

#[async_trait]
pub trait HoldingsServiceTrait: Send + Sync {
    /// Holdings aggregated from the current ledger and price snapshot.
    fn get_holdings(&self, include_liquidated: bool) -> Result<Vec<Holding>>;

    fn get_portfolio_summary(&self) -> Result<PortfolioSummary>;

    fn get_weekly_performance(&self, today: NaiveDate) -> Result<WeeklyPerformance>;

    /// Syncs history for every instrument in the ledger.
    async fn sync_market_data(&self) -> Result<SyncReport>;

    /// Refreshes realtime quotes for active, priced holdings.
    async fn refresh_realtime_quotes(&self) -> Result<RealtimeQuotes>;
}

pub struct HoldingsService {
    ledger: Arc<dyn LedgerServiceTrait>,
    price_service: Arc<dyn PriceServiceTrait>,
}

impl HoldingsService {
    pub fn new(
        ledger: Arc<dyn LedgerServiceTrait>,
        price_service: Arc<dyn PriceServiceTrait>,
    ) -> Self {
        Self {
            ledger,
            price_service,
        }
    }

    fn all_holdings(&self) -> Result<Vec<Holding>> {
        let transactions = self.ledger.list_transactions()?;
        let prices = self.price_service.snapshot();
        Ok(HoldingsCalculator::new(&prices).calculate(&transactions))
    }
}

#[async_trait]
impl HoldingsServiceTrait for HoldingsService {
    fn get_holdings(&self, include_liquidated: bool) -> Result<Vec<Holding>> {
        let mut holdings = self.all_holdings()?;
        if !include_liquidated {
            holdings.retain(Holding::is_active);
        }
        Ok(holdings)
    }

    fn get_portfolio_summary(&self) -> Result<PortfolioSummary> {
        Ok(summarize_portfolio(&self.all_holdings()?))
    }

    fn get_weekly_performance(&self, today: NaiveDate) -> Result<WeeklyPerformance> {
        let transactions = self.ledger.list_transactions()?;
        let prices = self.price_service.snapshot();
        let holdings = HoldingsCalculator::new(&prices).calculate(&transactions);
        Ok(weekly_performance(&holdings, &prices.history, today))
    }

    async fn sync_market_data(&self) -> Result<SyncReport> {
        let codes = instrument_codes(&self.ledger.list_transactions()?);
        debug!("Market sync requested for {} instrument(s)", codes.len());
        self.price_service.sync_history(&codes).await
    }

    async fn refresh_realtime_quotes(&self) -> Result<RealtimeQuotes> {
        let codes: Vec<String> = self
            .all_holdings()?
            .into_iter()
            .filter(|h| h.is_active() && h.category != Category::Cash)
            .map(|h| h.instrument_code)
            .collect();
        self.price_service.refresh_realtime(&codes).await
    }
}
