use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fundpilot_core::errors::{DatabaseError, Error as CoreError, StrategyError};
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Core(err) => match err {
                CoreError::Validation(_) => StatusCode::BAD_REQUEST,
                CoreError::Database(DatabaseError::NotFound(_)) => StatusCode::NOT_FOUND,
                CoreError::Strategy(StrategyError::NoSession)
                | CoreError::Strategy(StrategyError::DecisionOutOfRange { .. }) => {
                    StatusCode::NOT_FOUND
                }
                CoreError::Strategy(StrategyError::EmptySession) => StatusCode::CONFLICT,
                CoreError::Strategy(StrategyError::PriceUnavailable(_)) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                CoreError::MarketData(_) => StatusCode::BAD_GATEWAY,
                CoreError::Persistence(_)
                | CoreError::Database(_)
                | CoreError::Repository(_)
                | CoreError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        let body = Json(json!({
            "code": status.as_u16(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}
