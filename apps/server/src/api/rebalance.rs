use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use fundpilot_core::portfolio::{plan_category_inflow, EqualizationPlan};
use fundpilot_core::transactions::Category;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
struct InflowRequest {
    category: Category,
    amount: Decimal,
}

/// Equal-value split of new money across one category's active holdings.
async fn plan_inflow(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InflowRequest>,
) -> ApiResult<Json<EqualizationPlan>> {
    let holdings = state.holdings_service.get_holdings(false)?;
    let plan = plan_category_inflow(&holdings, request.category, request.amount)?;
    Ok(Json(plan))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/rebalance/inflow", post(plan_inflow))
}
