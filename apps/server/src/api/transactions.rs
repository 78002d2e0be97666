use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use fundpilot_core::transactions::{NewTransaction, Transaction};

use crate::{error::ApiResult, main_lib::AppState};

async fn list_transactions(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let transactions = state.ledger_service.list_transactions()?;
    Ok(Json(transactions))
}

async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewTransaction>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let created = state.ledger_service.add_transaction(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    let _ = state.ledger_service.delete_transaction(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/transactions/{id}", delete(delete_transaction))
}
