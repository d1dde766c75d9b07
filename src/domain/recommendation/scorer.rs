use serde::Serialize;
use std::{cmp::Ordering, collections::HashSet};
use uuid::Uuid;

use crate::domain::{
    community::entity::Community, geo::Coordinates, gym::entity::Gym, intent::UserIntent,
};

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 50;

/// Full proximity bonus at 0 km, falling linearly to 0 at this radius.
pub const NEAR_RADIUS_KM: f64 = 50.0;
const FAR_RADIUS_KM: f64 = 100.0;
const NEAR_BONUS: f64 = 30.0;
const FAR_BONUS: f64 = 5.0;

const POPULARITY_CAP: f64 = 20.0;
const FACILITY_POINTS: f64 = 2.0;
const FACILITY_CAP: f64 = 10.0;

const TECHNIQUE_WORDS: &[&str] = &[
    "technique",
    "beginner",
    "training",
    "coaching",
    "clinic",
    "class",
    "workshop",
];
const TRAINING_FACILITIES: &[&str] = &[
    "training",
    "classes",
    "coaching",
    "kilter_board",
    "moon_board",
    "system_wall",
];
const EVENT_FACILITIES: &[&str] = &["events", "competitions"];

/// Something the scorer can rank.
pub trait Recommendable {
    fn id(&self) -> Uuid;
    fn name(&self) -> &str;
    /// Inactive or hidden entities are never recommended.
    fn is_eligible(&self) -> bool;
    fn location(&self) -> Option<Coordinates>;
    /// Points for a single declared intent.
    fn intent_bonus(&self, intent: UserIntent) -> f64;
    /// Points that do not depend on intents (popularity, facilities).
    fn base_bonus(&self) -> f64;
}

impl Recommendable for Community {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_eligible(&self) -> bool {
        self.is_active
    }

    fn location(&self) -> Option<Coordinates> {
        self.gym_location()
    }

    fn intent_bonus(&self, intent: UserIntent) -> f64 {
        match intent {
            UserIntent::JoinCommunities => 15.0,
            UserIntent::FindPartners if self.is_gym_linked() => 15.0,
            UserIntent::FindPartners => 5.0,
            UserIntent::DiscoverGyms if self.is_gym_linked() => 10.0,
            UserIntent::FindEvents if self.upcoming_event_count > 0 => 10.0,
            UserIntent::LearnTechniques if mentions_technique(self) => 10.0,
            UserIntent::ShareProgress => 5.0,
            _ => 0.0,
        }
    }

    fn base_bonus(&self) -> f64 {
        (self.member_count.max(0) as f64 / 10.0).min(POPULARITY_CAP)
    }
}

fn mentions_technique(community: &Community) -> bool {
    let text = format!(
        "{} {}",
        community.name,
        community.description.as_deref().unwrap_or_default()
    )
    .to_lowercase();
    TECHNIQUE_WORDS.iter().any(|w| text.contains(w))
}

impl Recommendable for Gym {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_eligible(&self) -> bool {
        !self.is_hidden
    }

    fn location(&self) -> Option<Coordinates> {
        Some(self.coordinates()).filter(Coordinates::is_valid)
    }

    fn intent_bonus(&self, intent: UserIntent) -> f64 {
        match intent {
            UserIntent::DiscoverGyms => 20.0,
            UserIntent::FindPartners => 10.0,
            UserIntent::LearnTechniques if self.has_any_facility(TRAINING_FACILITIES) => 10.0,
            UserIntent::FindEvents if self.has_any_facility(EVENT_FACILITIES) => 5.0,
            _ => 0.0,
        }
    }

    fn base_bonus(&self) -> f64 {
        (self.facilities.len() as f64 * FACILITY_POINTS).min(FACILITY_CAP)
    }
}

/// Linear falloff inside [`NEAR_RADIUS_KM`], a flat consolation out to 100 km.
pub fn proximity_bonus(distance_km: f64) -> f64 {
    if !distance_km.is_finite() || distance_km < 0.0 {
        0.0
    } else if distance_km <= NEAR_RADIUS_KM {
        NEAR_BONUS * (1.0 - distance_km / NEAR_RADIUS_KM)
    } else if distance_km <= FAR_RADIUS_KM {
        FAR_BONUS
    } else {
        0.0
    }
}

pub fn clamp_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

#[derive(Debug, Clone, Default)]
pub struct ScoringContext {
    pub intents: Vec<UserIntent>,
    pub location: Option<Coordinates>,
    /// Ids the user already belongs to.
    pub excluded: HashSet<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate<T> {
    #[serde(flatten)]
    pub entity: T,
    pub recommendation_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

fn score<T: Recommendable>(candidate: &T, ctx: &ScoringContext) -> (f64, Option<f64>) {
    let intents: f64 = ctx
        .intents
        .iter()
        .map(|intent| candidate.intent_bonus(*intent))
        .sum();

    let distance_km = match (ctx.location, candidate.location()) {
        (Some(here), Some(there)) => Some(here.distance_km(&there)),
        _ => None,
    };
    let proximity = distance_km.map(proximity_bonus).unwrap_or(0.0);

    (intents + proximity + candidate.base_bonus(), distance_km)
}

/// Ranks candidates, highest score first, and keeps the top `limit`.
///
/// Ties fall back to distance (unknown last), then name, then id, so identical
/// inputs always produce identical output.
pub fn recommend<T: Recommendable>(
    candidates: Vec<T>,
    ctx: &ScoringContext,
    limit: usize,
) -> Vec<ScoredCandidate<T>> {
    let mut scored: Vec<ScoredCandidate<T>> = candidates
        .into_iter()
        .filter(|c| c.is_eligible() && !ctx.excluded.contains(&c.id()))
        .map(|entity| {
            let (recommendation_score, distance_km) = score(&entity, ctx);
            ScoredCandidate {
                entity,
                recommendation_score,
                distance_km,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.recommendation_score
            .total_cmp(&a.recommendation_score)
            .then_with(|| compare_distance(a.distance_km, b.distance_km))
            .then_with(|| a.entity.name().cmp(b.entity.name()))
            .then_with(|| a.entity.id().cmp(&b.entity.id()))
    });
    scored.truncate(limit);
    scored
}

fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
