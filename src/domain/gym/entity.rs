use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::domain::geo::Coordinates;

#[derive(Debug, Clone, Serialize, Deserialize, TS, sqlx::FromRow)]
#[ts(export)]
pub struct Gym {
    pub id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<String>,
    pub country: Option<String>,
    pub facilities: Vec<String>,
    pub price_range: Option<String>,
    pub is_hidden: bool,
    pub created_at: DateTime<Utc>,
}

impl Gym {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    pub fn has_any_facility(&self, wanted: &[&str]) -> bool {
        self.facilities.iter().any(|f| {
            let f = f.trim().to_ascii_lowercase();
            wanted.iter().any(|w| f == *w)
        })
    }
}
