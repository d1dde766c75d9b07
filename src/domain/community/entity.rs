use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::domain::geo::Coordinates;

#[derive(Debug, Clone, Serialize, Deserialize, TS, sqlx::FromRow)]
#[ts(export)]
pub struct Community {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Counted from membership rows on every read, never stored.
    pub member_count: i64,
    pub gym_id: Option<Uuid>,
    pub gym_latitude: Option<f64>,
    pub gym_longitude: Option<f64>,
    pub is_active: bool,
    pub upcoming_event_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Community {
    pub fn is_gym_linked(&self) -> bool {
        self.gym_id.is_some()
    }

    pub fn gym_location(&self) -> Option<Coordinates> {
        Coordinates::from_pair(self.gym_latitude, self.gym_longitude)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, sqlx::FromRow)]
#[ts(export)]
pub struct Membership {
    pub community_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
}
