use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        geo::{Coordinates, format_distance},
        gym::entity::Gym,
    },
    presentation::http::{errors::AppError, state::AppState},
};

const DEFAULT_RADIUS_KM: f64 = 25.0;
const MAX_RADIUS_KM: f64 = 500.0;
const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 200;

#[derive(Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius_km: Option<f64>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct NearbyGym {
    #[serde(flatten)]
    pub gym: Gym,
    pub distance_km: f64,
    pub distance_label: String,
}

/// Visible gyms within `radius_km` of `origin`, nearest first.
pub fn nearest_gyms(gyms: Vec<Gym>, origin: Coordinates, radius_km: f64, limit: usize) -> Vec<NearbyGym> {
    let mut nearby: Vec<NearbyGym> = gyms
        .into_iter()
        .filter(|gym| !gym.is_hidden)
        .filter_map(|gym| {
            let distance_km = origin.distance_km(&gym.coordinates());
            (distance_km <= radius_km).then(|| NearbyGym {
                distance_label: format_distance(distance_km),
                distance_km,
                gym,
            })
        })
        .collect();
    nearby.sort_by(|a, b| {
        a.distance_km
            .total_cmp(&b.distance_km)
            .then_with(|| a.gym.name.cmp(&b.gym.name))
    });
    nearby.truncate(limit);
    nearby
}

pub async fn get_nearby_gyms(
    State(state): State<AppState>,
    Query(params): Query<NearbyQuery>,
) -> Result<Json<Vec<NearbyGym>>, AppError> {
    let origin = Coordinates::new(params.lat, params.lng);
    if !origin.is_valid() {
        return Err(AppError::BadRequest("lat/lng out of range".into()));
    }
    let radius_km = params.radius_km.unwrap_or(DEFAULT_RADIUS_KM);
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(AppError::BadRequest("radius_km must be positive".into()));
    }

    let gyms = state.gyms.list_all().await?;
    Ok(Json(nearest_gyms(
        gyms,
        origin,
        radius_km.min(MAX_RADIUS_KM),
        params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
    )))
}
