use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use fundpilot_core::market_data::{RealtimeQuotes, SyncReport};

use crate::{error::ApiResult, main_lib::AppState};

async fn sync_history(State(state): State<Arc<AppState>>) -> ApiResult<Json<SyncReport>> {
    let report = state.holdings_service.sync_market_data().await?;
    Ok(Json(report))
}

async fn refresh_realtime(State(state): State<Arc<AppState>>) -> ApiResult<Json<RealtimeQuotes>> {
    let quotes = state.holdings_service.refresh_realtime_quotes().await?;
    Ok(Json(quotes))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/market/sync", post(sync_history))
        .route("/market/realtime", post(refresh_realtime))
}
