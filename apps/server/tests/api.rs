use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

use leverfolio_core::quotes::{PriceMap, StaticPriceProvider};
use leverfolio_server::{api::app_router, build_state_with_prices, config::Config};

async fn build_test_router(prices: &[(&str, f64)]) -> (Router, TempDir) {
    let tmp = tempdir().unwrap();
    let config = Config {
        db_path: tmp.path().join("test.db").to_string_lossy().to_string(),
        ..Config::default()
    };
    let price_map: PriceMap = prices.iter().map(|(t, p)| (t.to_string(), *p)).collect();
    let state = build_state_with_prices(&config, Arc::new(StaticPriceProvider::new(price_map)))
        .await
        .unwrap();
    (app_router(state, &config), tmp)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(payload) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn send_csv(app: &Router, uri: &str, csv: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "text/csv")
        .body(Body::from(csv.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn healthz_responds_ok() {
    let (app, _tmp) = build_test_router(&[]).await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn empty_portfolio_reports_null_leverage() {
    let (app, _tmp) = build_test_router(&[]).await;
    let (status, summary) = send(&app, Method::GET, "/api/v1/portfolio/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["leverage"]["nlv"], 0.0);
    assert_eq!(summary["leverage"]["tnv"], 0.0);
    assert!(summary["leverage"]["leverageRatio"].is_null());
    assert_eq!(summary["roi"], 0.0);
}

#[tokio::test]
async fn deposit_and_buy_produce_leverage() {
    let (app, _tmp) = build_test_router(&[("AAPL", 150.0)]).await;

    let (status, flow) = send(
        &app,
        Method::POST,
        "/api/v1/cash-flows",
        Some(json!({ "date": "2024-01-01", "amount": 10000.0, "type": "DEPOSIT" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(flow["amount"], 10000.0);

    let (status, tx) = send(
        &app,
        Method::POST,
        "/api/v1/transactions",
        Some(json!({
            "ticker": "aapl",
            "tradeDate": "2024-01-02 10:00:00",
            "action": "BUY",
            "quantity": 100.0,
            "price": 150.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tx["ticker"], "AAPL");
    assert_eq!(tx["amount"], 15000.0);

    let (_, summary) = send(&app, Method::GET, "/api/v1/portfolio/summary", None).await;
    assert_eq!(summary["leverage"]["tnv"], 15000.0);
    assert_eq!(summary["leverage"]["cashBalance"], -5000.0);
    assert_eq!(summary["leverage"]["nlv"], 10000.0);
    assert_eq!(summary["leverage"]["leverageRatio"], 1.5);
    assert_eq!(summary["positions"][0]["ticker"], "AAPL");

    let (_, recent) = send(&app, Method::GET, "/api/v1/transactions?limit=1", None).await;
    assert_eq!(recent.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn manual_trade_is_tagged() {
    let (app, _tmp) = build_test_router(&[]).await;
    let (status, tx) = send(
        &app,
        Method::POST,
        "/api/v1/transactions/manual",
        Some(json!({
            "ticker": "MSFT",
            "tradeDate": "2024-02-01",
            "action": "buy",
            "quantity": 2.0,
            "price": 400.0,
            "fees": 1.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tx["sourceFile"], "MANUAL_ENTRY");
    assert_eq!(tx["amount"], 801.0);
    let raw: Value = serde_json::from_str(tx["rawData"].as_str().unwrap()).unwrap();
    assert_eq!(raw["source"], "manual_entry");
}

#[tokio::test]
async fn invalid_input_is_bad_request() {
    let (app, _tmp) = build_test_router(&[]).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/transactions",
        Some(json!({
            "ticker": "AAPL",
            "tradeDate": "2024-01-02",
            "action": "BUY",
            "quantity": -1.0,
            "price": 10.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let (status, _) = send(&app, Method::GET, "/api/v1/transactions?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/api/v1/snapshots?start=yesterday", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_unknown_rows_is_not_found() {
    let (app, _tmp) = build_test_router(&[]).await;
    let (status, _) = send(&app, Method::DELETE, "/api/v1/transactions/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, "/api/v1/cash-flows/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ibkr_import_records_trades_and_dividends() {
    let (app, _tmp) = build_test_router(&[]).await;
    let csv = "Type,Symbol,Date/Time,Quantity,T. Price,Comm/Fee,Currency,Amount\n\
               Trade,NVDA,2024-03-01,10,100,-1,USD,\n\
               Trade,NVDA,2024-03-02,-4,110,-1,USD,\n\
               Dividend,NVDA,2024-03-03,,,,USD,2.5\n\
               Interest,,2024-03-04,,,,USD,0.3\n";

    let (status, summary) = send_csv(
        &app,
        "/api/v1/transactions/import?format=ibkr&source=ibkr.csv",
        csv,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["transactionsImported"], 2);
    assert_eq!(summary["cashFlowsImported"], 1);
    assert_eq!(summary["rowsSkipped"], 1);

    let (_, flows) = send(&app, Method::GET, "/api/v1/cash-flows", None).await;
    assert_eq!(flows[0]["type"], "DIVIDEND");

    let (status, _) = send_csv(&app, "/api/v1/transactions/import?format=schwab", csv).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn snapshot_endpoint_upserts_one_row_per_day() {
    let (app, _tmp) = build_test_router(&[]).await;
    send(
        &app,
        Method::POST,
        "/api/v1/cash-flows",
        Some(json!({ "date": "2024-01-01", "amount": 500.0, "type": "DEPOSIT" })),
    )
    .await;

    let (status, first) = send(&app, Method::POST, "/api/v1/portfolio/snapshot", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["totalNlv"], 500.0);
    let (_, second) = send(&app, Method::POST, "/api/v1/portfolio/snapshot", None).await;
    assert_eq!(first["date"], second["date"]);

    let (_, snapshots) = send(&app, Method::GET, "/api/v1/snapshots", None).await;
    assert_eq!(snapshots.as_array().unwrap().len(), 1);
    assert_eq!(snapshots[0]["investedCapital"], 500.0);
}

#[tokio::test]
async fn settings_hide_api_key() {
    let (app, _tmp) = build_test_router(&[]).await;
    let (status, settings) = send(
        &app,
        Method::PUT,
        "/api/v1/settings",
        Some(json!({
            "AI_PROVIDER": "OpenRouter",
            "AI_MODEL": "anthropic/claude-3.5-sonnet",
            "API_KEY": "sk-secret",
            "TIMEZONE": "Europe/London"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["timezone"], "Europe/London");
    assert_eq!(settings["aiProvider"]["provider"], "openRouter");
    assert!(!settings.to_string().contains("sk-secret"));

    let (_, provider) = send(&app, Method::GET, "/api/v1/settings/ai-provider", None).await;
    assert_eq!(provider["model"], "anthropic/claude-3.5-sonnet");

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/v1/settings",
        Some(json!({ "AI_PROVIDER": "Mystery AI" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn attribution_scores_recommendations() {
    let (app, _tmp) = build_test_router(&[("NVDA", 130.0)]).await;
    let (status, rec) = send(
        &app,
        Method::POST,
        "/api/v1/recommendations",
        Some(json!({
            "agent": "momentum",
            "ticker": "NVDA",
            "signal": "BUY",
            "priceAtSignal": 100.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rec["outcomeScore"], 0);

    let (status, summary) =
        send(&app, Method::POST, "/api/v1/recommendations/attribution", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["evaluated"], 1);
    assert_eq!(summary["hits"], 1);

    let (_, all) = send(&app, Method::GET, "/api/v1/recommendations", None).await;
    assert_eq!(all[0]["outcomeScore"], 1);
    assert!(!all[0]["evaluatedAt"].is_null());
}
