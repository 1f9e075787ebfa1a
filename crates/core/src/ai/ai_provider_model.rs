//! AI provider domain models.
//!
//! The provider, model and key are stored as loose settings. They are resolved
//! once into an [`AiProviderConfig`] so consumers never juggle string keys.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{Result, ValidationError};

/// Settings key holding the provider display name.
pub const AI_PROVIDER_KEY: &str = "AI_PROVIDER";
/// Settings key holding the model identifier.
pub const AI_MODEL_KEY: &str = "AI_MODEL";
/// Settings key holding the provider API key.
pub const API_KEY_KEY: &str = "API_KEY";
/// Optional endpoint override for OpenAI-compatible servers.
pub const BASE_URL_KEY: &str = "BASE_URL";

pub const PROVIDER_GOOGLE_GEMINI: &str = "Google Gemini";
pub const PROVIDER_OPENROUTER: &str = "OpenRouter";
pub const PROVIDER_OPENAI: &str = "OpenAI";

pub const DEFAULT_AI_PROVIDER: &str = PROVIDER_GOOGLE_GEMINI;
pub const DEFAULT_AI_MODEL: &str = "gemini-1.5-pro";

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const OPENROUTER_CHAT_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiConfig {
    pub model: String,
    #[serde(default, skip_serializing)]
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenRouterConfig {
    pub model: String,
    #[serde(default, skip_serializing)]
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenAiConfig {
    pub model: String,
    #[serde(default, skip_serializing)]
    pub api_key: String,
    pub base_url: Option<String>,
}

/// Resolved LLM provider selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "camelCase")]
pub enum AiProviderConfig {
    GoogleGemini(GeminiConfig),
    OpenRouter(OpenRouterConfig),
    OpenAi(OpenAiConfig),
}

impl AiProviderConfig {
    /// Builds the config from stored settings. Missing keys fall back to the
    /// Gemini defaults; an unrecognised provider name is a validation error.
    pub fn from_settings(settings: &BTreeMap<String, String>) -> Result<Self> {
        let get = |key: &str| {
            settings
                .get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let provider = get(AI_PROVIDER_KEY).unwrap_or_else(|| DEFAULT_AI_PROVIDER.to_string());
        let model = get(AI_MODEL_KEY).unwrap_or_else(|| DEFAULT_AI_MODEL.to_string());
        let api_key = get(API_KEY_KEY).unwrap_or_default();

        match provider.as_str() {
            PROVIDER_GOOGLE_GEMINI => Ok(AiProviderConfig::GoogleGemini(GeminiConfig {
                model,
                api_key,
            })),
            PROVIDER_OPENROUTER => Ok(AiProviderConfig::OpenRouter(OpenRouterConfig {
                model,
                api_key,
            })),
            PROVIDER_OPENAI => Ok(AiProviderConfig::OpenAi(OpenAiConfig {
                model,
                api_key,
                base_url: get(BASE_URL_KEY),
            })),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown AI provider '{}'. Expected one of: {}, {}, {}",
                other, PROVIDER_GOOGLE_GEMINI, PROVIDER_OPENROUTER, PROVIDER_OPENAI
            ))
            .into()),
        }
    }

    pub fn provider_name(&self) -> &'static str {
        match self {
            AiProviderConfig::GoogleGemini(_) => PROVIDER_GOOGLE_GEMINI,
            AiProviderConfig::OpenRouter(_) => PROVIDER_OPENROUTER,
            AiProviderConfig::OpenAi(_) => PROVIDER_OPENAI,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            AiProviderConfig::GoogleGemini(c) => &c.model,
            AiProviderConfig::OpenRouter(c) => &c.model,
            AiProviderConfig::OpenAi(c) => &c.model,
        }
    }

    pub fn has_api_key(&self) -> bool {
        let key = match self {
            AiProviderConfig::GoogleGemini(c) => &c.api_key,
            AiProviderConfig::OpenRouter(c) => &c.api_key,
            AiProviderConfig::OpenAi(c) => &c.api_key,
        };
        !key.is_empty()
    }

    /// Request URL for a completion call.
    ///
    /// Gemini carries the key in the query string; the other providers expect
    /// a bearer header instead.
    pub fn endpoint(&self) -> String {
        match self {
            AiProviderConfig::GoogleGemini(c) => {
                let model_id = if c.model.starts_with("models/") {
                    c.model.clone()
                } else {
                    format!("models/{}", c.model)
                };
                format!(
                    "{}/{}:generateContent?key={}",
                    GEMINI_API_BASE, model_id, c.api_key
                )
            }
            AiProviderConfig::OpenRouter(_) => OPENROUTER_CHAT_URL.to_string(),
            AiProviderConfig::OpenAi(c) => c
                .base_url
                .clone()
                .unwrap_or_else(|| OPENAI_CHAT_URL.to_string()),
        }
    }
}
