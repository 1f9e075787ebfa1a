//! Yahoo Finance market data provider.
//!
//! Fetches the most recent daily bar for equities/ETFs (e.g. AAPL, 0050.TW)
//! and uses its close as the current price.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, warn};
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::Quote;
use crate::provider::MarketDataProvider;

const PROVIDER_ID: &str = "YAHOO";

/// Yahoo Finance market data provider.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
    currency: String,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider quoting in `USD`.
    pub fn new() -> Result<Self, MarketDataError> {
        Self::with_currency("USD")
    }

    /// Create a provider that labels its quotes with the given currency.
    pub fn with_currency(currency: &str) -> Result<Self, MarketDataError> {
        let connector =
            yahoo::YahooConnector::new().map_err(|e| {
                MarketDataError::unavailable(PROVIDER_ID, format!("connector init failed: {}", e))
            })?;
        Ok(Self {
            connector,
            currency: currency.to_string(),
        })
    }

    fn yahoo_quote_to_quote(
        &self,
        symbol: &str,
        yahoo_quote: yahoo::Quote,
    ) -> Result<Quote, MarketDataError> {
        let timestamp: DateTime<Utc> = Utc
            .timestamp_opt(yahoo_quote.timestamp as i64, 0)
            .single()
            .ok_or_else(|| MarketDataError::InvalidQuote {
                symbol: symbol.to_string(),
                message: format!("timestamp {} out of range", yahoo_quote.timestamp),
            })?;

        let mut quote = Quote::new(
            symbol,
            timestamp,
            yahoo_quote.close,
            self.currency.as_str(),
            PROVIDER_ID,
        );
        quote.volume = Some(yahoo_quote.volume);

        if !quote.is_usable() {
            return Err(MarketDataError::InvalidQuote {
                symbol: symbol.to_string(),
                message: format!(
                    "close {} is not a finite, non-negative price",
                    yahoo_quote.close
                ),
            });
        }
        Ok(quote)
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        debug!("Fetching latest quote for {} from Yahoo", symbol);

        let response = self
            .connector
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| {
                if matches!(e, yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult) {
                    MarketDataError::SymbolNotFound(symbol.to_string())
                } else {
                    MarketDataError::unavailable(PROVIDER_ID, e.to_string())
                }
            })?;

        let yahoo_quote = response.last_quote().map_err(|e| {
            warn!("No quotes returned for {}: {}", symbol, e);
            MarketDataError::SymbolNotFound(symbol.to_string())
        })?;

        self.yahoo_quote_to_quote(symbol, yahoo_quote)
    }
}
