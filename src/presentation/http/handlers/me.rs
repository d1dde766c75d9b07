use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    application::onboarding::OnboardingRequest,
    domain::{
        geo::{Coordinates, Position},
        profile::Profile,
        rate_limit::{ActionType, RateLimitDecision},
    },
    infrastructure::location::ReportedPosition,
    presentation::http::{errors::AppError, middleware::user::require_user_id, state::AppState},
};

pub async fn get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Profile>, AppError> {
    let user_id = require_user_id(&headers, &state.config.jwt_secret)?;
    Ok(Json(state.onboarding.profile(user_id).await?))
}

pub async fn complete_onboarding(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<OnboardingRequest>,
) -> Result<(StatusCode, Json<Profile>), AppError> {
    let user_id = require_user_id(&headers, &state.config.jwt_secret)?;
    body.validate()?;
    let profile = state.onboarding.complete(user_id, body).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// What the client's geolocation prompt produced.
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportLocationRequest {
    Granted {
        latitude: f64,
        longitude: f64,
        accuracy_m: Option<f64>,
    },
    Denied,
}

impl ReportLocationRequest {
    fn into_reported(self) -> ReportedPosition {
        let now = Utc::now();
        match self {
            Self::Granted {
                latitude,
                longitude,
                accuracy_m,
            } => ReportedPosition::Granted(Position {
                coordinates: Coordinates::new(latitude, longitude),
                accuracy_m,
                captured_at: now,
            }),
            Self::Denied => ReportedPosition::Denied { reported_at: now },
        }
    }
}

pub async fn report_location(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ReportLocationRequest>,
) -> Result<StatusCode, AppError> {
    let user_id = require_user_id(&headers, &state.config.jwt_secret)?;
    let reported = body.into_reported();
    if let ReportedPosition::Granted(position) = &reported {
        if !position.coordinates.is_valid() {
            return Err(AppError::BadRequest("latitude/longitude out of range".into()));
        }
    }
    state
        .location
        .report(user_id, reported)
        .await
        .map_err(|e| AppError::Cache(e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct LocationStatus {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Never fails on location errors; they are reported in the body.
pub async fn current_location(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LocationStatus>, AppError> {
    let user_id = require_user_id(&headers, &state.config.jwt_secret)?;
    let status = match state.location.current_position(user_id).await {
        Ok(position) => LocationStatus {
            available: true,
            position: Some(position),
            reason: None,
        },
        Err(e) => LocationStatus {
            available: false,
            position: None,
            reason: Some(e.to_string()),
        },
    };
    Ok(Json(status))
}

pub async fn rate_limit_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(action): Path<String>,
) -> Result<Json<RateLimitDecision>, AppError> {
    let user_id = require_user_id(&headers, &state.config.jwt_secret)?;
    let action: ActionType = action
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Unknown action type: {}", action)))?;
    Ok(Json(state.rate_limiter.status(user_id, action).await))
}
