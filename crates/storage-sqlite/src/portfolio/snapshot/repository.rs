use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use log::debug;
use std::sync::Arc;

use super::model::DailySnapshotDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::daily_snapshots;
use leverfolio_core::constants::DATE_FORMAT;
use leverfolio_core::errors::Result;
use leverfolio_core::portfolio::{DailySnapshot, DailySnapshotRepositoryTrait};

pub struct DailySnapshotRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl DailySnapshotRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl DailySnapshotRepositoryTrait for DailySnapshotRepository {
    fn get_snapshot(&self, date: NaiveDate) -> Result<Option<DailySnapshot>> {
        let mut conn = get_connection(&self.pool)?;
        daily_snapshots::table
            .find(date.format(DATE_FORMAT).to_string())
            .select(DailySnapshotDB::as_select())
            .first::<DailySnapshotDB>(&mut conn)
            .optional()
            .into_core()?
            .map(DailySnapshot::try_from)
            .transpose()
    }

    fn list_snapshots(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<DailySnapshot>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = daily_snapshots::table
            .select(DailySnapshotDB::as_select())
            .into_boxed();
        if let Some(start) = start_date {
            query = query.filter(daily_snapshots::date.ge(start.format(DATE_FORMAT).to_string()));
        }
        if let Some(end) = end_date {
            query = query.filter(daily_snapshots::date.le(end.format(DATE_FORMAT).to_string()));
        }
        query
            .order(daily_snapshots::date.asc())
            .load::<DailySnapshotDB>(&mut conn)
            .into_core()?
            .into_iter()
            .map(DailySnapshot::try_from)
            .collect()
    }

    async fn upsert_daily_snapshot(&self, snapshot: DailySnapshot) -> Result<DailySnapshot> {
        let row = DailySnapshotDB::from(&snapshot);
        debug!("Upserting daily snapshot for {}", row.date);
        self.writer
            .exec(move |conn| {
                diesel::insert_into(daily_snapshots::table)
                    .values(&row)
                    .on_conflict(daily_snapshots::date)
                    .do_update()
                    .set(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(snapshot)
            })
            .await
    }
}
