pub mod cached_gym_repository;
pub mod memory_rate_limit_store;
pub mod sqlx_community_repository;
pub mod sqlx_gym_repository;
pub mod sqlx_moderation_log_repository;
pub mod sqlx_profile_repository;
pub mod sqlx_rate_limit_store;
pub mod sqlx_social_repository;
