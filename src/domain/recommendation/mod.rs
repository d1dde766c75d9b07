//! Additive scoring of communities and gyms against a user's intents.
//!
//! Scores are plain sums of independent terms (intent matches, proximity,
//! popularity or facility richness). Nothing is normalized or persisted; a
//! fresh ranking is computed for every request.

mod scorer;

pub use scorer::{
    DEFAULT_LIMIT, MAX_LIMIT, NEAR_RADIUS_KM, Recommendable, ScoredCandidate, ScoringContext,
    clamp_limit, proximity_bonus, recommend,
};
