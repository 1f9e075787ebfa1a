//! Price resolution for valuation.

mod price_provider;

pub use price_provider::{
    MarketDataPriceProvider, PriceMap, PriceProviderTrait, StaticPriceProvider,
};
