//! SQLite storage implementation for daily snapshots.

mod model;
mod repository;

pub use model::DailySnapshotDB;
pub use repository::DailySnapshotRepository;

// Re-export trait from core for convenience
pub use leverfolio_core::portfolio::DailySnapshotRepositoryTrait;
