use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::{api::shared::parse_optional_date, error::ApiResult, main_lib::AppState};
use leverfolio_core::portfolio::{DailySnapshot, PortfolioSummary};

async fn get_portfolio_summary(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PortfolioSummary>> {
    let summary = state.portfolio_service.get_portfolio_summary().await?;
    Ok(Json(summary))
}

async fn refresh_snapshot(State(state): State<Arc<AppState>>) -> ApiResult<Json<DailySnapshot>> {
    let snapshot = state.portfolio_service.refresh_daily_snapshot().await?;
    Ok(Json(snapshot))
}

#[derive(Debug, Deserialize)]
struct SnapshotsQuery {
    start: Option<String>,
    end: Option<String>,
}

async fn list_snapshots(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SnapshotsQuery>,
) -> ApiResult<Json<Vec<DailySnapshot>>> {
    let start = parse_optional_date("start", q.start.as_deref())?;
    let end = parse_optional_date("end", q.end.as_deref())?;
    Ok(Json(state.portfolio_service.list_snapshots(start, end)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/portfolio/summary", get(get_portfolio_summary))
        .route("/portfolio/snapshot", post(refresh_snapshot))
        .route("/snapshots", get(list_snapshots))
}
