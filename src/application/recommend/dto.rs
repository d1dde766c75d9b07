use crate::domain::geo::Coordinates;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RecommendationQuery {
    pub limit: Option<usize>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl RecommendationQuery {
    /// Both halves must be present and in range, otherwise the query carries no location.
    pub fn location(&self) -> Option<Coordinates> {
        Coordinates::from_pair(self.lat, self.lng)
    }
}
