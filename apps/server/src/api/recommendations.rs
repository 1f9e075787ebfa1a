use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::{error::ApiResult, main_lib::AppState};
use leverfolio_core::recommendations::{AttributionSummary, NewRecommendation, Recommendation};

async fn list_recommendations(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Recommendation>>> {
    Ok(Json(state.recommendation_service.list_recommendations()?))
}

async fn create_recommendation(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewRecommendation>,
) -> ApiResult<Json<Recommendation>> {
    let created = state
        .recommendation_service
        .record_recommendation(payload)
        .await?;
    Ok(Json(created))
}

async fn run_attribution(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<AttributionSummary>> {
    Ok(Json(state.recommendation_service.run_attribution().await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/recommendations",
            get(list_recommendations).post(create_recommendation),
        )
        .route("/recommendations/attribution", post(run_attribution))
}
