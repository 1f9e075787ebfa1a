//! Market data provider trait definitions.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::Quote;

/// Trait for market data providers.
///
/// Implement this trait to add support for a new quote source.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use leverfolio_market_data::{MarketDataError, MarketDataProvider, Quote};
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl MarketDataProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
///         todo!()
///     }
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "YAHOO". Used for logging.
    fn id(&self) -> &'static str;

    /// Fetch the latest quote for a ticker symbol.
    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;
}
