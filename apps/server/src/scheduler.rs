//! Background job that keeps the daily snapshot current.

use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};

use crate::main_lib::AppState;

/// Initial delay before the first run, to let the server finish starting.
const INITIAL_DELAY_SECS: u64 = 5;

/// Starts the periodic snapshot refresh. A zero `period` disables it.
pub fn start_snapshot_scheduler(state: Arc<AppState>, period: Duration) {
    if period.is_zero() {
        info!("Snapshot scheduler disabled");
        return;
    }

    tokio::spawn(async move {
        info!(
            "Snapshot scheduler started ({}s interval, {} calendar)",
            period.as_secs(),
            state.timezone
        );
        tokio::time::sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            run_scheduled_snapshot(&state).await;
        }
    });
}

async fn run_scheduled_snapshot(state: &Arc<AppState>) {
    match state.portfolio_service.refresh_daily_snapshot().await {
        Ok(snapshot) => info!(
            "Scheduled snapshot for {}: NLV {:.2}, P&L {:.2}",
            snapshot.date, snapshot.total_nlv, snapshot.pnl
        ),
        Err(e) => warn!("Scheduled snapshot failed: {}", e),
    }
}
