//! Leverfolio Market Data Crate
//!
//! Provider-agnostic latest-quote fetching for the Leverfolio portfolio core.
//!
//! ```text
//! +------------------+     +--------------------+     +-----------+
//! |  core PriceMap   | <-- | MarketDataProvider | <-- |  Yahoo    |
//! +------------------+     +--------------------+     +-----------+
//! ```
//!
//! # Core Types
//!
//! - [`Quote`] - Latest market quote for a symbol
//! - [`MarketDataProvider`] - Trait implemented by every quote source
//! - [`MarketDataError`] - Per-symbol failure, terminal or transient

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::Quote;
pub use provider::yahoo::YahooProvider;
pub use provider::MarketDataProvider;
