use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::{
    api::shared::trigger_snapshot_refresh,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use leverfolio_core::{
    errors::Error as CoreError,
    ingest::{BrokerFormat, ImportSummary},
    ledger::{CashFlow, ManualTrade, NewCashFlow, NewTransaction, Transaction},
};

#[derive(Debug, Deserialize)]
struct TransactionsQuery {
    limit: Option<i64>,
}

async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(q): Query<TransactionsQuery>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let transactions = match q.limit {
        Some(limit) => state.ledger_service.get_recent_transactions(limit)?,
        None => state.ledger_service.list_transactions()?,
    };
    Ok(Json(transactions))
}

async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewTransaction>,
) -> ApiResult<Json<Transaction>> {
    let created = state.ledger_service.add_transaction(payload).await?;
    trigger_snapshot_refresh(state);
    Ok(Json(created))
}

async fn create_manual_trade(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ManualTrade>,
) -> ApiResult<Json<Transaction>> {
    let created = state.ledger_service.add_manual_trade(payload).await?;
    trigger_snapshot_refresh(state);
    Ok(Json(created))
}

async fn delete_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Transaction>> {
    let removed = state.ledger_service.delete_transaction(&id).await?;
    trigger_snapshot_refresh(state);
    Ok(Json(removed))
}

#[derive(Debug, Deserialize)]
struct ImportQuery {
    format: String,
    source: Option<String>,
}

async fn import_transactions(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ImportQuery>,
    body: Bytes,
) -> ApiResult<Json<ImportSummary>> {
    let format: BrokerFormat = q.format.parse().map_err(CoreError::from)?;
    if body.is_empty() {
        return Err(ApiError::BadRequest("CSV body is empty".to_string()));
    }
    let source = q
        .source
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| format!("{}-upload.csv", format));

    let summary = state
        .ledger_service
        .import_csv(&body, format, &source)
        .await?;
    trigger_snapshot_refresh(state);
    Ok(Json(summary))
}

async fn list_cash_flows(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<CashFlow>>> {
    Ok(Json(state.ledger_service.list_cash_flows()?))
}

async fn create_cash_flow(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewCashFlow>,
) -> ApiResult<Json<CashFlow>> {
    let created = state.ledger_service.add_cash_flow(payload).await?;
    trigger_snapshot_refresh(state);
    Ok(Json(created))
}

async fn delete_cash_flow(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CashFlow>> {
    let removed = state.ledger_service.delete_cash_flow(&id).await?;
    trigger_snapshot_refresh(state);
    Ok(Json(removed))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/transactions/manual", post(create_manual_trade))
        .route("/transactions/import", post(import_transactions))
        .route("/transactions/{id}", delete(delete_transaction))
        .route("/cash-flows", get(list_cash_flows).post(create_cash_flow))
        .route("/cash-flows/{id}", delete(delete_cash_flow))
}
