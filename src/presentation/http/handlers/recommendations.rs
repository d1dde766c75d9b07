use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
};

use crate::{
    application::recommend::RecommendationQuery,
    domain::{community::entity::Community, gym::entity::Gym, recommendation::ScoredCandidate},
    presentation::http::{errors::AppError, middleware::user::require_user_id, state::AppState},
};

pub async fn recommend_communities(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RecommendationQuery>,
) -> Result<Json<Vec<ScoredCandidate<Community>>>, AppError> {
    let user_id = require_user_id(&headers, &state.config.jwt_secret)?;
    Ok(Json(state.recommendations.communities(user_id, query).await))
}

pub async fn recommend_gyms(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RecommendationQuery>,
) -> Result<Json<Vec<ScoredCandidate<Gym>>>, AppError> {
    let user_id = require_user_id(&headers, &state.config.jwt_secret)?;
    Ok(Json(state.recommendations.gyms(user_id, query).await))
}
