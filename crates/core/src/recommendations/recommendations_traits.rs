use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::{AttributionSummary, NewRecommendation, Recommendation};
use crate::errors::Result;

#[async_trait]
pub trait RecommendationRepositoryTrait: Send + Sync {
    /// All recommendations, newest first.
    fn list_recommendations(&self) -> Result<Vec<Recommendation>>;

    /// Recommendations with no `evaluated_at`, oldest first.
    fn list_unevaluated(&self) -> Result<Vec<Recommendation>>;

    async fn create_recommendation(&self, recommendation: Recommendation)
        -> Result<Recommendation>;

    /// Stores the score for each `(id, score)` pair in a single write.
    async fn record_outcomes(
        &self,
        outcomes: Vec<(String, i32)>,
        evaluated_at: NaiveDateTime,
    ) -> Result<usize>;
}

#[async_trait]
pub trait RecommendationServiceTrait: Send + Sync {
    fn list_recommendations(&self) -> Result<Vec<Recommendation>>;

    async fn record_recommendation(
        &self,
        new_recommendation: NewRecommendation,
    ) -> Result<Recommendation>;

    async fn run_attribution(&self) -> Result<AttributionSummary>;
}
