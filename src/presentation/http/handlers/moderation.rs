use axum::{Json, extract::State, http::HeaderMap};
use validator::Validate;

use crate::{
    application::moderate_content::{ScanRequest, ScanResponse},
    domain::rate_limit::ActionType,
    presentation::http::{errors::AppError, middleware::user::require_user_id, state::AppState},
};

/// Scans text and image URLs without storing anything.
pub async fn scan_content(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ScanRequest>,
) -> Result<Json<ScanResponse>, AppError> {
    let user_id = require_user_id(&headers, &state.config.jwt_secret)?;
    body.validate()?;

    let decision = state
        .rate_limiter
        .check(user_id, ActionType::ModerationScan)
        .await;
    if !decision.allowed {
        return Err(AppError::RateLimited {
            reset_at: Some(decision.reset_at),
        });
    }

    let verdict = state.moderation.scan(&body).await;
    let policy = state.moderation.policy();
    Ok(Json(ScanResponse {
        action: policy.decide(&verdict),
        blocked: policy.should_block(&verdict),
        verdict,
    }))
}
