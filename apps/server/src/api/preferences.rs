use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use fundpilot_core::preferences::StrategyPreferences;

use crate::{error::ApiResult, main_lib::AppState};

async fn get_preferences(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<StrategyPreferences>> {
    Ok(Json(state.preferences_service.get_preferences()?))
}

async fn update_preferences(
    State(state): State<Arc<AppState>>,
    Json(preferences): Json<StrategyPreferences>,
) -> ApiResult<Json<StrategyPreferences>> {
    let saved = state
        .preferences_service
        .update_preferences(preferences)
        .await?;
    Ok(Json(saved))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/preferences", get(get_preferences).put(update_preferences))
}
