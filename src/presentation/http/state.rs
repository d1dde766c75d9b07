use crate::{
    application::{
        moderate_content::{ModerateContentUseCase, ModerationPolicy},
        onboarding::OnboardingUseCase,
        recommend::RecommendUseCase,
        social::SocialUseCase,
    },
    config::Config,
    domain::{community::repository::CommunityRepository, gym::repository::GymRepository},
    infrastructure::{
        cache::redis_cache::RedisCache,
        location::{LocationService, redis_position_source::RedisPositionSource},
        repositories::{
            cached_gym_repository::CachedGymRepository,
            sqlx_community_repository::SqlxCommunityRepository,
            sqlx_gym_repository::SqlxGymRepository,
            sqlx_moderation_log_repository::SqlxModerationLogRepository,
            sqlx_profile_repository::SqlxProfileRepository,
            sqlx_rate_limit_store::SqlxRateLimitStore,
            sqlx_social_repository::SqlxSocialRepository,
        },
        security::{
            image_classifier::{HttpImageClassifier, ImageClassifier, UrlHeuristicClassifier},
            nsfw_scanner::NsfwScanner,
            rate_limiter::RateLimiter,
        },
    },
};
use sqlx::PgPool;
use std::{sync::Arc, time::Duration};

/// Everything a handler needs, built once and injected.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: Arc<RedisCache>,
    pub config: Config,
    pub communities: Arc<dyn CommunityRepository>,
    pub gyms: Arc<dyn GymRepository>,
    pub rate_limiter: Arc<RateLimiter>,
    pub location: Arc<LocationService>,
    pub moderation: Arc<ModerateContentUseCase>,
    pub social: Arc<SocialUseCase>,
    pub recommendations: Arc<RecommendUseCase>,
    pub onboarding: Arc<OnboardingUseCase>,
}

impl AppState {
    /// Wires repositories and use cases over one pool and one Redis client.
    ///
    /// Nothing here connects; the pool may be lazy.
    pub fn build(config: Config, db: PgPool, redis: redis::Client) -> anyhow::Result<Self> {
        let cache = Arc::new(RedisCache::new(redis));

        let communities: Arc<dyn CommunityRepository> =
            Arc::new(SqlxCommunityRepository::new(db.clone()));
        let gyms: Arc<dyn GymRepository> = Arc::new(CachedGymRepository::new(
            Arc::new(SqlxGymRepository::new(db.clone())),
            cache.clone(),
            config.gym_cache_ttl_seconds,
        ));
        let profiles = Arc::new(SqlxProfileRepository::new(db.clone()));

        let rate_limiter = Arc::new(RateLimiter::new(
            Arc::new(SqlxRateLimitStore::new(db.clone())),
            config.rate_limit_policies(),
        ));

        let location = Arc::new(LocationService::new(
            Arc::new(RedisPositionSource::new(cache.clone())),
            config.location_options(),
        ));

        let scanner = Arc::new(
            NsfwScanner::new().with_extra_keywords(config.moderation_extra_keywords.iter()),
        );
        let classifier: Arc<dyn ImageClassifier> = match &config.image_classifier_url {
            Some(endpoint) => Arc::new(HttpImageClassifier::new(
                endpoint.clone(),
                config.image_classifier_api_key.clone(),
                Duration::from_millis(config.image_classifier_timeout_ms),
                scanner.clone(),
            )?),
            None => Arc::new(UrlHeuristicClassifier::new(scanner.clone())),
        };
        let moderation = Arc::new(ModerateContentUseCase::new(
            scanner,
            classifier,
            Arc::new(SqlxModerationLogRepository::new(db.clone())),
            ModerationPolicy::default(),
            config.moderation_fail_policy,
        ));

        let social = Arc::new(SocialUseCase::new(
            Arc::new(SqlxSocialRepository::new(db.clone())),
            communities.clone(),
            rate_limiter.clone(),
            moderation.clone(),
        ));
        let recommendations = Arc::new(RecommendUseCase::new(
            communities.clone(),
            gyms.clone(),
            profiles.clone(),
            location.clone(),
        ));
        let onboarding = Arc::new(OnboardingUseCase::new(profiles));

        Ok(Self {
            db,
            cache,
            config,
            communities,
            gyms,
            rate_limiter,
            location,
            moderation,
            social,
            recommendations,
            onboarding,
        })
    }
}
