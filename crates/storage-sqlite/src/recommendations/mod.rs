//! SQLite storage implementation for agent recommendations.

mod model;
mod repository;

pub use model::RecommendationDB;
pub use repository::RecommendationRepository;

// Re-export trait from core for convenience
pub use leverfolio_core::recommendations::RecommendationRepositoryTrait;
