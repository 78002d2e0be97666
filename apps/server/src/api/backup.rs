use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use fundpilot_core::backup::{BackupSnapshot, RestoreSummary};

use crate::{error::ApiResult, main_lib::AppState};

async fn export_snapshot(State(state): State<Arc<AppState>>) -> ApiResult<Json<BackupSnapshot>> {
    Ok(Json(state.backup_service.export_snapshot(Utc::now())?))
}

async fn import_snapshot(
    State(state): State<Arc<AppState>>,
    Json(snapshot): Json<BackupSnapshot>,
) -> ApiResult<Json<RestoreSummary>> {
    let summary = state.backup_service.import_snapshot(snapshot).await?;
    // The restored store may carry a different price cache
    if let Err(e) = state.price_service.load_cache() {
        tracing::warn!("Price cache reload after restore failed: {}", e);
    }
    Ok(Json(summary))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/backup/export", get(export_snapshot))
        .route("/backup/import", post(import_snapshot))
}
