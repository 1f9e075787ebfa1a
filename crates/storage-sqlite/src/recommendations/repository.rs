use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use log::debug;
use std::sync::Arc;

use super::model::RecommendationDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::recommendations;
use leverfolio_core::errors::Result;
use leverfolio_core::recommendations::{Recommendation, RecommendationRepositoryTrait};
use leverfolio_core::utils::time_utils::format_trade_date;

pub struct RecommendationRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl RecommendationRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn to_recommendations(rows: Vec<RecommendationDB>) -> Result<Vec<Recommendation>> {
    rows.into_iter().map(Recommendation::try_from).collect()
}

#[async_trait]
impl RecommendationRepositoryTrait for RecommendationRepository {
    fn list_recommendations(&self) -> Result<Vec<Recommendation>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = recommendations::table
            .select(RecommendationDB::as_select())
            .order((recommendations::date.desc(), recommendations::id.desc()))
            .load::<RecommendationDB>(&mut conn)
            .into_core()?;
        to_recommendations(rows)
    }

    fn list_unevaluated(&self) -> Result<Vec<Recommendation>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = recommendations::table
            .filter(recommendations::evaluated_at.is_null())
            .select(RecommendationDB::as_select())
            .order((recommendations::date.asc(), recommendations::id.asc()))
            .load::<RecommendationDB>(&mut conn)
            .into_core()?;
        to_recommendations(rows)
    }

    async fn create_recommendation(
        &self,
        recommendation: Recommendation,
    ) -> Result<Recommendation> {
        let row = RecommendationDB::from(recommendation.clone());
        self.writer
            .exec(move |conn| {
                diesel::insert_into(recommendations::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(recommendation)
            })
            .await
    }

    async fn record_outcomes(
        &self,
        outcomes: Vec<(String, i32)>,
        evaluated_at: NaiveDateTime,
    ) -> Result<usize> {
        if outcomes.is_empty() {
            return Ok(0);
        }
        let stamp = format_trade_date(&evaluated_at);
        debug!("Recording {} recommendation outcomes", outcomes.len());
        self.writer
            .exec(move |conn| {
                let mut updated = 0;
                for (rec_id, score) in &outcomes {
                    updated += diesel::update(recommendations::table.find(rec_id))
                        .set((
                            recommendations::outcome_score.eq(*score),
                            recommendations::evaluated_at.eq(Some(stamp.as_str())),
                        ))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(updated)
            })
            .await
    }
}
