//! Coordinates, great-circle distance and distance labels.
//!
//! Everything in here is pure. The only suspending part of geolocation (asking
//! for a user's current position) lives in `infrastructure::location`.

mod distance;

pub use distance::{EARTH_RADIUS_KM, format_distance, haversine_km};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Latitude in [-90, 90], longitude in [-180, 180], both finite.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        haversine_km(*self, *other)
    }

    /// Builds coordinates from an optional query pair; both halves must be present.
    pub fn from_pair(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lng)) => Some(Self::new(lat, lng)).filter(Coordinates::is_valid),
            _ => None,
        }
    }
}

/// A position as reported by a client device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Position {
    pub coordinates: Coordinates,
    /// Reported accuracy radius in meters, if the device gave one.
    pub accuracy_m: Option<f64>,
    pub captured_at: chrono::DateTime<chrono::Utc>,
}
