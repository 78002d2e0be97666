use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use fundpilot_core::portfolio::{Holding, PortfolioSummary, WeeklyPerformance};
use fundpilot_core::utils::time_utils::market_date_today;
use serde::Deserialize;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
struct HoldingsQuery {
    #[serde(rename = "includeLiquidated", default)]
    include_liquidated: bool,
}

async fn get_holdings(
    State(state): State<Arc<AppState>>,
    Query(q): Query<HoldingsQuery>,
) -> ApiResult<Json<Vec<Holding>>> {
    let holdings = state.holdings_service.get_holdings(q.include_liquidated)?;
    Ok(Json(holdings))
}

async fn get_summary(State(state): State<Arc<AppState>>) -> ApiResult<Json<PortfolioSummary>> {
    let summary = state.holdings_service.get_portfolio_summary()?;
    Ok(Json(summary))
}

async fn get_weekly(State(state): State<Arc<AppState>>) -> ApiResult<Json<WeeklyPerformance>> {
    let today = market_date_today(state.market_timezone);
    let weekly = state.holdings_service.get_weekly_performance(today)?;
    Ok(Json(weekly))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/holdings", get(get_holdings))
        .route("/portfolio/summary", get(get_summary))
        .route("/portfolio/weekly", get(get_weekly))
}
