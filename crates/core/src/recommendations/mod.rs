//! Agent recommendations and their outcome attribution.

mod recommendations_model;
mod recommendations_service;
mod recommendations_traits;


pub use recommendations_model::*;
pub use recommendations_service::RecommendationService;
pub use recommendations_traits::{RecommendationRepositoryTrait, RecommendationServiceTrait};
