use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use uuid::Uuid;

use crate::{
    domain::community::entity::{Community, Membership},
    presentation::http::{errors::AppError, middleware::user::require_user_id, state::AppState},
};

pub async fn list_communities(
    State(state): State<AppState>,
) -> Result<Json<Vec<Community>>, AppError> {
    Ok(Json(state.communities.list_active().await?))
}

pub async fn get_community(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Community>, AppError> {
    state
        .communities
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("community {}", id)))
}

pub async fn join_community(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<Membership>), AppError> {
    let user_id = require_user_id(&headers, &state.config.jwt_secret)?;
    let membership = state.social.join(user_id, id).await?;
    Ok((StatusCode::CREATED, Json(membership)))
}

pub async fn leave_community(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let user_id = require_user_id(&headers, &state.config.jwt_secret)?;
    if state.social.leave(user_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("membership".into()))
    }
}
