use std::sync::Arc;

use chrono::NaiveDate;

use crate::{error::ApiError, main_lib::AppState};
use leverfolio_core::utils::time_utils::parse_calendar_date;

/// Recompute today's snapshot after a ledger mutation without holding up the
/// response. Failures are logged; the next mutation or scheduled run retries.
pub fn trigger_snapshot_refresh(state: Arc<AppState>) {
    tokio::spawn(async move {
        if let Err(err) = state.portfolio_service.refresh_daily_snapshot().await {
            tracing::warn!("Snapshot refresh after ledger change failed: {}", err);
        }
    });
}

pub fn parse_optional_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| {
            parse_calendar_date(v)
                .map_err(|_| ApiError::BadRequest(format!("Invalid {}: {}", field, v)))
        })
        .transpose()
}
