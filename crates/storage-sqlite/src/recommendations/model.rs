//! Database model for recommendations.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use leverfolio_core::errors::{Error, Result};
use leverfolio_core::recommendations::Recommendation;
use leverfolio_core::utils::time_utils::{format_trade_date, parse_trade_date};

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::recommendations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct RecommendationDB {
    pub id: String,
    pub date: String,
    pub agent: String,
    pub ticker: String,
    pub signal: String,
    pub price_at_signal: Option<f64>,
    pub outcome_score: i32,
    pub evaluated_at: Option<String>,
}

impl From<Recommendation> for RecommendationDB {
    fn from(rec: Recommendation) -> Self {
        Self {
            date: format_trade_date(&rec.date),
            evaluated_at: rec.evaluated_at.as_ref().map(format_trade_date),
            id: rec.id,
            agent: rec.agent,
            ticker: rec.ticker,
            signal: rec.signal,
            price_at_signal: rec.price_at_signal,
            outcome_score: rec.outcome_score,
        }
    }
}

impl TryFrom<RecommendationDB> for Recommendation {
    type Error = Error;

    fn try_from(db: RecommendationDB) -> Result<Self> {
        Ok(Self {
            date: parse_trade_date(&db.date)?,
            evaluated_at: db.evaluated_at.as_deref().map(parse_trade_date).transpose()?,
            id: db.id,
            agent: db.agent,
            ticker: db.ticker,
            signal: db.signal,
            price_at_signal: db.price_at_signal,
            outcome_score: db.outcome_score,
        })
    }
}
