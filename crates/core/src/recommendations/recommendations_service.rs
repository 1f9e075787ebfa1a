use async_trait::async_trait;
use chrono_tz::Tz;
use log::{debug, info};
use std::collections::BTreeSet;
use std::sync::Arc;
use uuid::Uuid;

use super::{
    score_outcome, AttributionSummary, NewRecommendation, Recommendation,
    RecommendationRepositoryTrait, RecommendationServiceTrait,
};
use crate::errors::Result;
use crate::quotes::PriceProviderTrait;
use crate::utils::time_utils::now_in;

pub struct RecommendationService {
    repository: Arc<dyn RecommendationRepositoryTrait>,
    price_provider: Arc<dyn PriceProviderTrait>,
    timezone: Tz,
}

impl RecommendationService {
    pub fn new(
        repository: Arc<dyn RecommendationRepositoryTrait>,
        price_provider: Arc<dyn PriceProviderTrait>,
        timezone: Tz,
    ) -> Self {
        Self {
            repository,
            price_provider,
            timezone,
        }
    }
}

#[async_trait]
impl RecommendationServiceTrait for RecommendationService {
    fn list_recommendations(&self) -> Result<Vec<Recommendation>> {
        self.repository.list_recommendations()
    }

    async fn record_recommendation(
        &self,
        new_recommendation: NewRecommendation,
    ) -> Result<Recommendation> {
        new_recommendation.validate()?;
        let recommendation = Recommendation {
            id: Uuid::now_v7().to_string(),
            date: now_in(self.timezone),
            agent: new_recommendation.agent.trim().to_string(),
            ticker: new_recommendation.ticker.trim().to_uppercase(),
            signal: new_recommendation.signal.trim().to_uppercase(),
            price_at_signal: new_recommendation.price_at_signal,
            outcome_score: 0,
            evaluated_at: None,
        };
        self.repository.create_recommendation(recommendation).await
    }

    async fn run_attribution(&self) -> Result<AttributionSummary> {
        let pending = self.repository.list_unevaluated()?;
        if pending.is_empty() {
            return Ok(AttributionSummary::default());
        }

        let tickers: Vec<String> = pending
            .iter()
            .map(|r| r.ticker.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let prices = self.price_provider.get_current_prices(&tickers).await?;

        let mut summary = AttributionSummary::default();
        let mut outcomes = Vec::with_capacity(pending.len());
        for rec in &pending {
            let score = match (rec.price_at_signal, prices.get(&rec.ticker)) {
                // Nothing to compare against; the call can never be scored.
                (None, _) => 0,
                (Some(signal_price), Some(current)) => {
                    score_outcome(&rec.signal, signal_price, *current)
                }
                (Some(_), None) => {
                    debug!("No price for {}; leaving {} unevaluated", rec.ticker, rec.id);
                    summary.skipped += 1;
                    continue;
                }
            };
            match score {
                1 => summary.hits += 1,
                -1 => summary.misses += 1,
                _ => {}
            }
            outcomes.push((rec.id.clone(), score));
        }

        summary.evaluated = self
            .repository
            .record_outcomes(outcomes, now_in(self.timezone))
            .await?;
        info!(
            "Attribution scored {} recommendations ({} hits, {} misses, {} skipped)",
            summary.evaluated, summary.hits, summary.misses, summary.skipped
        );
        Ok(summary)
    }
}
