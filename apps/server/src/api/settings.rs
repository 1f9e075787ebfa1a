use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::{error::ApiResult, main_lib::AppState};
use leverfolio_core::{
    ai::AiProviderConfig,
    settings::{AppSettings, SettingsMap},
};

// The typed view is returned instead of the raw map so the API key never
// leaves the server.
async fn get_settings(State(state): State<Arc<AppState>>) -> ApiResult<Json<AppSettings>> {
    Ok(Json(state.settings_service.get_app_settings()?))
}

async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SettingsMap>,
) -> ApiResult<Json<AppSettings>> {
    state.settings_service.update_settings(&payload).await?;
    Ok(Json(state.settings_service.get_app_settings()?))
}

async fn get_ai_provider(State(state): State<Arc<AppState>>) -> ApiResult<Json<AiProviderConfig>> {
    Ok(Json(state.settings_service.get_ai_provider_config()?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/settings", get(get_settings).put(update_settings))
        .route("/settings/ai-provider", get(get_ai_provider))
}
