use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{get, patch, post},
    Json, Router,
};
use fundpilot_core::strategy::{ConfirmationReceipt, DecisionUpdate, StrategySession};
use fundpilot_core::utils::time_utils::market_date_today;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize, Default)]
struct PlanRequest {
    #[serde(default)]
    budget: Option<Decimal>,
}

/// An empty body plans with the suggested budget.
async fn plan(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<StrategySession>> {
    let request: PlanRequest = if body.iter().all(u8::is_ascii_whitespace) {
        PlanRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid plan request: {}", e)))?
    };
    let today = market_date_today(state.market_timezone);
    let session = state.strategy_service.plan(request.budget, today).await?;
    Ok(Json(session))
}

async fn current_session(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<StrategySession>> {
    Ok(Json(state.strategy_service.current_session().await?))
}

async fn update_decision(
    Path(index): Path<usize>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<DecisionUpdate>,
) -> ApiResult<Json<StrategySession>> {
    let session = state
        .strategy_service
        .update_decision(index, update)
        .await?;
    Ok(Json(session))
}

async fn remove_decision(
    Path(index): Path<usize>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<StrategySession>> {
    Ok(Json(state.strategy_service.remove_decision(index).await?))
}

async fn confirm(State(state): State<Arc<AppState>>) -> ApiResult<Json<ConfirmationReceipt>> {
    let receipt = state.strategy_service.confirm().await?;
    tracing::info!(
        "Confirmed {} deployment(s) totalling {}",
        receipt.transactions.len(),
        receipt.total_cash_amount
    );
    Ok(Json(receipt))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/strategy/plan", post(plan))
        .route("/strategy/session", get(current_session))
        .route(
            "/strategy/decisions/{index}",
            patch(update_decision).delete(remove_decision),
        )
        .route("/strategy/confirm", post(confirm))
}
