use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::utils::time_utils::naive_datetime_format;

/// Signal string that gets a directional score.
pub const SIGNAL_BUY: &str = "BUY";

/// Price move (fraction of the signal price) that counts as a hit or a miss.
pub const ATTRIBUTION_THRESHOLD: f64 = 0.05;

/// An agent's call on a ticker, scored later against the market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    #[serde(with = "naive_datetime_format")]
    pub date: NaiveDateTime,
    pub agent: String,
    pub ticker: String,
    pub signal: String,
    pub price_at_signal: Option<f64>,
    pub outcome_score: i32,
    pub evaluated_at: Option<NaiveDateTime>,
}

impl Recommendation {
    pub fn is_evaluated(&self) -> bool {
        self.evaluated_at.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecommendation {
    pub agent: String,
    pub ticker: String,
    pub signal: String,
    pub price_at_signal: Option<f64>,
}

impl NewRecommendation {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("agent", &self.agent),
            ("ticker", &self.ticker),
            ("signal", &self.signal),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(field.to_string()).into());
            }
        }
        if let Some(price) = self.price_at_signal {
            if !price.is_finite() || price < 0.0 {
                return Err(ValidationError::InvalidInput(format!(
                    "price_at_signal must be a finite, non-negative number, got {}",
                    price
                ))
                .into());
            }
        }
        Ok(())
    }
}

/// Outcome of one attribution run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionSummary {
    pub evaluated: usize,
    /// Left unevaluated because no current price was available.
    pub skipped: usize,
    pub hits: usize,
    pub misses: usize,
}

/// Scores a call against the current price.
///
/// BUY scores +1 above `(1 + ATTRIBUTION_THRESHOLD) × signal price`, -1 below
/// `(1 - ATTRIBUTION_THRESHOLD) × signal price`, 0 otherwise. Other signals
/// always score 0.
pub fn score_outcome(signal: &str, price_at_signal: f64, current_price: f64) -> i32 {
    if !signal.trim().eq_ignore_ascii_case(SIGNAL_BUY) {
        return 0;
    }
    if current_price > price_at_signal * (1.0 + ATTRIBUTION_THRESHOLD) {
        1
    } else if current_price < price_at_signal * (1.0 - ATTRIBUTION_THRESHOLD) {
        -1
    } else {
        0
    }
}
