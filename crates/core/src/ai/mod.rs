//! LLM provider configuration.

mod ai_provider_model;

pub use ai_provider_model::*;
