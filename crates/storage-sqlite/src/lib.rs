//! SQLite storage implementation for Leverfolio.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `leverfolio-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for the ledger, snapshots, settings and recommendations
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! `core` is database-agnostic and works with traits.
//!
//! ```text
//!        core (domain)
//!              │
//!              ▼
//!   storage-sqlite (this crate)
//!              │
//!              ▼
//!          SQLite DB
//! ```
//!
//! All writes go through a single [`WriteHandle`] actor; reads borrow pooled
//! connections directly.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod ledger;
pub mod portfolio;
pub mod recommendations;
pub mod settings;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, open, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use ledger::LedgerRepository;
pub use portfolio::snapshot::DailySnapshotRepository;
pub use recommendations::RecommendationRepository;
pub use settings::SettingsRepository;

// Re-export from leverfolio-core for convenience
pub use leverfolio_core::errors::{DatabaseError, Error, Result};
