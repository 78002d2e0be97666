use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Days, NaiveDate, Utc};
use fundpilot_core::store::InMemoryStore;
use fundpilot_market_data::{MarketDataError, PricePoint, PriceProvider};
use fundpilot_server::{api::app_router, build_services, config::Config};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Flat NAV of 1.02 for the last two weeks, for any code.
struct FlatProvider;

#[async_trait]
impl PriceProvider for FlatProvider {
    fn id(&self) -> &'static str {
        "FLAT"
    }

    async fn fetch_history(&self, _code: &str) -> Result<Vec<PricePoint>, MarketDataError> {
        let today = Utc::now().date_naive();
        Ok((1..=14)
            .rev()
            .filter_map(|back| today.checked_sub_days(Days::new(back)))
            .map(|date| PricePoint::new(date, dec!(1.02)))
            .collect())
    }

    async fn fetch_realtime(&self, _code: &str) -> Result<Decimal, MarketDataError> {
        Ok(dec!(1.03))
    }
}

fn test_config() -> Config {
    Config {
        listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        db_path: String::new(),
        log_format: "text".to_string(),
        market_timezone: chrono_tz::Asia::Shanghai,
        history_base_url: None,
        realtime_base_url: None,
        request_timeout: Duration::from_secs(5),
        cors_allow_origins: Vec::new(),
    }
}

fn build_test_router() -> Router {
    let state = build_services(
        Arc::new(InMemoryStore::new()),
        Arc::new(FlatProvider),
        chrono_tz::Asia::Shanghai,
    );
    app_router(state, &test_config())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn buy(code: &str, category: &str, units: f64, amount: f64) -> Value {
    let date = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
    json!({
        "instrumentCode": code,
        "displayName": format!("Fund {code}"),
        "category": category,
        "kind": "buy",
        "units": units,
        "recordedCashAmount": amount,
        "settlementDate": date.to_string(),
    })
}

#[tokio::test]
async fn healthz_responds() {
    let app = build_test_router();
    let (status, body) = send(&app, Method::GET, "/api/v1/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn transaction_lifecycle() {
    let app = build_test_router();

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/v1/transactions",
        Some(buy("000123", "bond", 10.0, 10.2)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, listed) = send(&app, Method::GET, "/api/v1/transactions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/transactions/{id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::DELETE, "/api/v1/transactions/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn invalid_transaction_is_bad_request() {
    let app = build_test_router();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/transactions",
        Some(buy("000123", "bond", 0.0, 0.0)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Units must be positive"));
}

#[tokio::test]
async fn sync_then_holdings_and_summary() {
    let app = build_test_router();
    send(
        &app,
        Method::POST,
        "/api/v1/transactions",
        Some(buy("000123", "bond", 10.0, 10.2)),
    )
    .await;
    send(
        &app,
        Method::POST,
        "/api/v1/transactions",
        Some(buy("510300", "equity", 100.0, 100.0)),
    )
    .await;

    let (status, report) = send(&app, Method::POST, "/api/v1/market/sync", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["results"].as_array().unwrap().len(), 2);

    let (status, holdings) = send(&app, Method::GET, "/api/v1/holdings", None).await;
    assert_eq!(status, StatusCode::OK);
    let holdings = holdings.as_array().unwrap();
    assert_eq!(holdings.len(), 2);
    assert_eq!(holdings[0]["instrumentCode"], "510300");
    assert_eq!(holdings[0]["totalUnits"].as_f64(), Some(100.0));

    let (status, summary) = send(&app, Method::GET, "/api/v1/portfolio/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["totalMarketValue"].as_f64(), Some(112.2));

    let (status, _) = send(&app, Method::GET, "/api/v1/portfolio/weekly", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn strategy_session_flow() {
    let app = build_test_router();

    let (status, _) = send(&app, Method::GET, "/api/v1/strategy/session", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(
        &app,
        Method::POST,
        "/api/v1/transactions",
        Some(buy("000123", "bond", 10.0, 10.2)),
    )
    .await;
    send(&app, Method::POST, "/api/v1/market/sync", None).await;

    let (status, session) = send(&app, Method::POST, "/api/v1/strategy/plan", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["budget"].as_f64(), Some(200.0));
    assert_eq!(session["decisions"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/v1/strategy/decisions/5",
        Some(json!({ "units": 1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, receipt) = send(&app, Method::POST, "/api/v1/strategy/confirm", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["transactions"].as_array().unwrap().len(), 1);

    let (_, listed) = send(&app, Method::GET, "/api/v1/transactions", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 2);

    let (status, _) = send(&app, Method::POST, "/api/v1/strategy/confirm", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn inflow_requires_positive_amount() {
    let app = build_test_router();
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/rebalance/inflow",
        Some(json!({ "category": "bond", "amount": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn backup_export_and_import() {
    let source = build_test_router();
    send(
        &source,
        Method::PUT,
        "/api/v1/preferences",
        Some(json!({ "defaultBudget": 250, "boostedBudget": 400 })),
    )
    .await;
    let (status, snapshot) = send(&source, Method::GET, "/api/v1/backup/export", None).await;
    assert_eq!(status, StatusCode::OK);

    let target = build_test_router();
    let (status, summary) =
        send(&target, Method::POST, "/api/v1/backup/import", Some(snapshot)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["restoredKeys"], json!(["strategy_preferences"]));

    let (_, prefs) = send(&target, Method::GET, "/api/v1/preferences", None).await;
    assert_eq!(prefs["defaultBudget"].as_f64(), Some(250.0));
}
