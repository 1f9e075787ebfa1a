//! Leverfolio Core - Ledger, analytics engines, services, and traits.
//!
//! This crate contains the core business logic for Leverfolio.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod ai;
pub mod constants;
pub mod errors;
pub mod ingest;
pub mod ledger;
pub mod portfolio;
pub mod quotes;
pub mod recommendations;
pub mod settings;
pub mod utils;

// Re-export the ledger and analytics types used by every consumer
pub use ledger::*;
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
