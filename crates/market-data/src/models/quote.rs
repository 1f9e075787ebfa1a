use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latest market quote for a single symbol.
///
/// Prices are plain `f64`; the portfolio core does all of its accounting in
/// floating point with an explicit tolerance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Symbol the quote was fetched for (as requested, not provider-mangled)
    pub symbol: String,

    /// Timestamp of the quote
    pub timestamp: DateTime<Utc>,

    /// Closing/current price (required)
    pub close: f64,

    /// Trading volume (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,

    /// Quote currency
    pub currency: String,

    /// Source of the quote (YAHOO, MANUAL, ...)
    pub source: String,
}

impl Quote {
    /// Create a new quote with minimal required fields
    pub fn new(
        symbol: impl Into<String>,
        timestamp: DateTime<Utc>,
        close: f64,
        currency: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            close,
            volume: None,
            currency: currency.into(),
            source: source.into(),
        }
    }

    /// A quote is usable for valuation only when its close is a finite,
    /// non-negative number.
    pub fn is_usable(&self) -> bool {
        self.close.is_finite() && self.close >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_new() {
        let quote = Quote::new("AAPL", Utc::now(), 150.25, "USD", "YAHOO");
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.close, 150.25);
        assert_eq!(quote.currency, "USD");
        assert!(quote.volume.is_none());
        assert!(quote.is_usable());
    }

    #[test]
    fn test_quote_with_nan_close_is_not_usable() {
        let quote = Quote::new("AAPL", Utc::now(), f64::NAN, "USD", "YAHOO");
        assert!(!quote.is_usable());

        let negative = Quote::new("AAPL", Utc::now(), -1.0, "USD", "YAHOO");
        assert!(!negative.is_usable());
    }
}
