use super::dto::RecommendationQuery;
use crate::{
    domain::{
        community::{entity::Community, repository::CommunityRepository},
        gym::{entity::Gym, repository::GymRepository},
        intent::UserIntent,
        profile::ProfileRepository,
        recommendation::{ScoredCandidate, ScoringContext, clamp_limit, recommend},
    },
    infrastructure::location::LocationService,
};
use std::{collections::HashSet, sync::Arc};
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

/// Loads what the scorer needs and ranks communities or gyms for one user.
///
/// Every load failure degrades to an empty input and is logged; a broken
/// backend yields fewer (or no) recommendations, never an error.
pub struct RecommendUseCase {
    communities: Arc<dyn CommunityRepository>,
    gyms: Arc<dyn GymRepository>,
    profiles: Arc<dyn ProfileRepository>,
    location: Arc<LocationService>,
}

impl RecommendUseCase {
    pub fn new(
        communities: Arc<dyn CommunityRepository>,
        gyms: Arc<dyn GymRepository>,
        profiles: Arc<dyn ProfileRepository>,
        location: Arc<LocationService>,
    ) -> Self {
        Self {
            communities,
            gyms,
            profiles,
            location,
        }
    }

    #[instrument(skip(self, query), fields(limit = ?query.limit))]
    pub async fn communities(
        &self,
        user_id: Uuid,
        query: RecommendationQuery,
    ) -> Vec<ScoredCandidate<Community>> {
        let (intents, joined, candidates, location) = tokio::join!(
            self.intents(user_id),
            self.communities.member_community_ids(user_id),
            self.communities.list_candidates(),
            self.location.resolve(user_id, query.location()),
        );

        let ctx = ScoringContext {
            intents,
            location,
            excluded: or_empty(joined, "memberships").into_iter().collect(),
        };
        let ranked = recommend(or_empty(candidates, "communities"), &ctx, clamp_limit(query.limit));
        debug!(%user_id, count = ranked.len(), has_location = location.is_some(), "communities ranked");
        ranked
    }

    #[instrument(skip(self, query), fields(limit = ?query.limit))]
    pub async fn gyms(&self, user_id: Uuid, query: RecommendationQuery) -> Vec<ScoredCandidate<Gym>> {
        let (intents, member_gyms, candidates, location) = tokio::join!(
            self.intents(user_id),
            self.gyms.member_gym_ids(user_id),
            self.gyms.list_all(),
            self.location.resolve(user_id, query.location()),
        );

        let ctx = ScoringContext {
            intents,
            location,
            excluded: or_empty(member_gyms, "member gyms")
                .into_iter()
                .collect::<HashSet<_>>(),
        };
        let ranked = recommend(or_empty(candidates, "gyms"), &ctx, clamp_limit(query.limit));
        debug!(%user_id, count = ranked.len(), has_location = location.is_some(), "gyms ranked");
        ranked
    }

    async fn intents(&self, user_id: Uuid) -> Vec<UserIntent> {
        match self.profiles.find(user_id).await {
            Ok(Some(profile)) => profile.intents,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(%user_id, error = %e, "intents unavailable, scoring without them");
                Vec::new()
            }
        }
    }
}

fn or_empty<T, E: std::fmt::Display>(result: Result<Vec<T>, E>, what: &str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        error!(error = %e, "failed to load {}", what);
        Vec::new()
    })
}
