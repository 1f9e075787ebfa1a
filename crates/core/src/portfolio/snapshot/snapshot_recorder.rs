use chrono::NaiveDate;
use chrono_tz::Tz;
use log::info;
use std::sync::Arc;

use super::{DailySnapshot, DailySnapshotRepositoryTrait};
use crate::errors::Result;
use crate::ledger::LedgerRepositoryTrait;
use crate::portfolio::roi::net_invested_capital;
use crate::utils::time_utils::today_in;

/// Persists the daily NLV summary, one row per calendar day.
pub struct SnapshotRecorder {
    snapshot_repository: Arc<dyn DailySnapshotRepositoryTrait>,
    ledger_repository: Arc<dyn LedgerRepositoryTrait>,
    timezone: Tz,
}

impl SnapshotRecorder {
    pub fn new(
        snapshot_repository: Arc<dyn DailySnapshotRepositoryTrait>,
        ledger_repository: Arc<dyn LedgerRepositoryTrait>,
        timezone: Tz,
    ) -> Self {
        Self {
            snapshot_repository,
            ledger_repository,
            timezone,
        }
    }

    /// Records today's snapshot (today in the configured timezone).
    pub async fn record_daily_snapshot(
        &self,
        nlv: f64,
        cash_balance: f64,
    ) -> Result<DailySnapshot> {
        self.record_daily_snapshot_on(today_in(self.timezone), nlv, cash_balance)
            .await
    }

    /// Records the snapshot for an explicit date.
    pub async fn record_daily_snapshot_on(
        &self,
        date: NaiveDate,
        nlv: f64,
        cash_balance: f64,
    ) -> Result<DailySnapshot> {
        let cash_flows = self.ledger_repository.list_cash_flows()?;
        let invested_capital = net_invested_capital(&cash_flows);
        let snapshot = DailySnapshot::new(date, nlv, cash_balance, invested_capital);

        let saved = self
            .snapshot_repository
            .upsert_daily_snapshot(snapshot)
            .await?;
        info!(
            "Recorded snapshot for {}: NLV {:.2}, invested {:.2}, P&L {:.2}",
            saved.date, saved.total_nlv, saved.invested_capital, saved.pnl
        );
        Ok(saved)
    }
}
