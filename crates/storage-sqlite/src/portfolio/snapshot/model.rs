//! Database model for daily snapshots.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use leverfolio_core::constants::DATE_FORMAT;
use leverfolio_core::errors::{Error, Result};
use leverfolio_core::portfolio::DailySnapshot;
use leverfolio_core::utils::time_utils::parse_calendar_date;

/// One row per calendar day, keyed by `date` (`YYYY-MM-DD`).
#[derive(
    Debug, Clone, PartialEq, Queryable, Selectable, Insertable, AsChangeset, Serialize, Deserialize,
)]
#[diesel(table_name = crate::schema::daily_snapshots)]
#[diesel(primary_key(date))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct DailySnapshotDB {
    pub date: String,
    pub total_nlv: f64,
    pub cash_balance: f64,
    pub invested_capital: f64,
    pub pnl: f64,
}

impl From<&DailySnapshot> for DailySnapshotDB {
    fn from(snapshot: &DailySnapshot) -> Self {
        Self {
            date: snapshot.date.format(DATE_FORMAT).to_string(),
            total_nlv: snapshot.total_nlv,
            cash_balance: snapshot.cash_balance,
            invested_capital: snapshot.invested_capital,
            pnl: snapshot.pnl,
        }
    }
}

impl TryFrom<DailySnapshotDB> for DailySnapshot {
    type Error = Error;

    fn try_from(db: DailySnapshotDB) -> Result<Self> {
        Ok(Self {
            date: parse_calendar_date(&db.date)?,
            total_nlv: db.total_nlv,
            cash_balance: db.cash_balance,
            invested_capital: db.invested_capital,
            pnl: db.pnl,
        })
    }
}
