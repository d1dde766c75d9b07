use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        gym::{entity::Gym, repository::GymRepository},
        shared::errors::DomainError,
    },
    infrastructure::cache::redis_cache::RedisCache,
};

const GYM_LIST_KEY: &str = "gyms:all";

/// Serves the full gym list from Redis; everything else passes through.
pub struct CachedGymRepository {
    inner: Arc<dyn GymRepository>,
    cache: Arc<RedisCache>,
    ttl_seconds: u64,
}

impl CachedGymRepository {
    pub fn new(inner: Arc<dyn GymRepository>, cache: Arc<RedisCache>, ttl_seconds: u64) -> Self {
        Self {
            inner,
            cache,
            ttl_seconds,
        }
    }
}

#[async_trait]
impl GymRepository for CachedGymRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Gym>, DomainError> {
        self.inner.find_by_id(id).await
    }

    async fn list_all(&self) -> Result<Vec<Gym>, DomainError> {
        let inner = self.inner.clone();
        self.cache
            .get_or_fetch(GYM_LIST_KEY, self.ttl_seconds, || async move {
                Ok(inner.list_all().await?)
            })
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))
    }

    async fn member_gym_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        self.inner.member_gym_ids(user_id).await
    }
}
