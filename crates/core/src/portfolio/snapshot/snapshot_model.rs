//! Daily portfolio snapshot model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One point-in-time summary per calendar day.
///
/// Keyed by `date`; recording again on the same day overwrites the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySnapshot {
    pub date: NaiveDate,
    pub total_nlv: f64,
    pub cash_balance: f64,
    pub invested_capital: f64,
    /// `total_nlv - invested_capital`
    pub pnl: f64,
}

impl DailySnapshot {
    pub fn new(date: NaiveDate, total_nlv: f64, cash_balance: f64, invested_capital: f64) -> Self {
        Self {
            date,
            total_nlv,
            cash_balance,
            invested_capital,
            pnl: total_nlv - invested_capital,
        }
    }
}
