use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    application::social::{AddCommentRequest, CreatePostRequest},
    domain::{
        shared::pagination::PaginationRequest,
        social::{comment::Comment, post::Post},
    },
    presentation::http::{errors::AppError, middleware::user::require_user_id, state::AppState},
};

pub async fn create_post(
    State(state): State<AppState>,
    Path(community_id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let user_id = require_user_id(&headers, &state.config.jwt_secret)?;
    body.validate()?;
    if body.content.trim().is_empty() {
        return Err(AppError::BadRequest("Post cannot be empty".into()));
    }

    let post = state.social.create_post(user_id, community_id, body).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn list_posts(
    State(state): State<AppState>,
    Path(community_id): Path<Uuid>,
    Query(page): Query<PaginationRequest>,
) -> Result<Json<Vec<Post>>, AppError> {
    Ok(Json(state.social.list_posts(community_id, page).await?))
}

pub async fn add_comment(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<AddCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let user_id = require_user_id(&headers, &state.config.jwt_secret)?;
    body.validate()?;
    if body.content.trim().is_empty() {
        return Err(AppError::BadRequest("Comment cannot be empty".into()));
    }

    let comment = state.social.add_comment(user_id, post_id, body).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn get_comments(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Vec<Comment>>, AppError> {
    Ok(Json(state.social.get_comments(post_id).await?))
}
