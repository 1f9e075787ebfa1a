//! Current-price lookup for the analytics engines.
//!
//! The calculators never talk to the network; callers resolve a [`PriceMap`]
//! first and pass it in.

use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::Result;
use leverfolio_market_data::MarketDataProvider;

/// Ticker → latest price. Partial by contract: missing tickers are absent.
pub type PriceMap = HashMap<String, f64>;

#[async_trait]
pub trait PriceProviderTrait: Send + Sync {
    /// Latest prices for `tickers`. Tickers that cannot be priced are omitted
    /// rather than failing the whole call.
    async fn get_current_prices(&self, tickers: &[String]) -> Result<PriceMap>;
}

/// Fixed price table. Used when no live source is configured, and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceProvider {
    prices: PriceMap,
}

impl StaticPriceProvider {
    pub fn new(prices: PriceMap) -> Self {
        Self { prices }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PriceProviderTrait for StaticPriceProvider {
    async fn get_current_prices(&self, tickers: &[String]) -> Result<PriceMap> {
        Ok(tickers
            .iter()
            .filter_map(|t| self.prices.get(t).map(|p| (t.clone(), *p)))
            .collect())
    }
}

/// Live prices from a market-data provider, fetched concurrently.
pub struct MarketDataPriceProvider {
    provider: Arc<dyn MarketDataProvider>,
}

impl MarketDataPriceProvider {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl PriceProviderTrait for MarketDataPriceProvider {
    async fn get_current_prices(&self, tickers: &[String]) -> Result<PriceMap> {
        let fetches = tickers.iter().map(|ticker| {
            let provider = Arc::clone(&self.provider);
            async move { (ticker, provider.get_latest_quote(ticker).await) }
        });

        let mut prices = PriceMap::with_capacity(tickers.len());
        for (ticker, result) in join_all(fetches).await {
            match result {
                Ok(quote) if quote.is_usable() => {
                    prices.insert(ticker.clone(), quote.close);
                }
                Ok(quote) => {
                    warn!(
                        "Discarding unusable quote for {} from {}: {}",
                        ticker,
                        self.provider.id(),
                        quote.close
                    );
                }
                Err(e) if e.is_terminal() => {
                    debug!("No price for {} from {}: {}", ticker, self.provider.id(), e);
                }
                Err(e) => {
                    warn!(
                        "Failed to fetch price for {} from {}: {}",
                        ticker,
                        self.provider.id(),
                        e
                    );
                }
            }
        }
        debug!("Resolved {}/{} prices", prices.len(), tickers.len());
        Ok(prices)
    }
}
