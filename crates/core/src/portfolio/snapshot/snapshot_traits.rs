//! Repository traits for daily snapshots.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::DailySnapshot;
use crate::errors::Result;

/// Repository trait for the daily snapshot cache.
#[async_trait]
pub trait DailySnapshotRepositoryTrait: Send + Sync {
    /// Get the snapshot for a given date, if any.
    fn get_snapshot(&self, date: NaiveDate) -> Result<Option<DailySnapshot>>;

    /// Snapshots within an optional inclusive date range, oldest first.
    fn list_snapshots(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<DailySnapshot>>;

    /// Insert or overwrite the row for `snapshot.date`.
    async fn upsert_daily_snapshot(&self, snapshot: DailySnapshot) -> Result<DailySnapshot>;
}
