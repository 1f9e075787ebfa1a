use thiserror::Error;

/// Failure to produce a usable quote for one symbol.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider has no data for this symbol. Asking again will not help.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("{provider} unavailable: {message}")]
    ProviderUnavailable { provider: String, message: String },

    /// The provider answered, but the close price cannot be used for valuation.
    #[error("Invalid quote for {symbol}: {message}")]
    InvalidQuote { symbol: String, message: String },
}

impl MarketDataError {
    pub fn unavailable(provider: &str, message: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// True when the same request is expected to fail again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::ProviderUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_outages_are_transient() {
        assert!(MarketDataError::SymbolNotFound("ZZZZ".into()).is_terminal());
        assert!(MarketDataError::InvalidQuote {
            symbol: "AAPL".into(),
            message: "close is NaN".into(),
        }
        .is_terminal());
        assert!(!MarketDataError::unavailable("YAHOO", "502").is_terminal());
    }

    #[test]
    fn test_display_names_provider() {
        let error = MarketDataError::unavailable("YAHOO", "bad gateway");
        assert_eq!(error.to_string(), "YAHOO unavailable: bad gateway");
    }
}
