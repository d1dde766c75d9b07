use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use uuid::Uuid;

use super::service::{LocationError, PositionSource, ReportedPosition};
use crate::infrastructure::cache::redis_cache::RedisCache;

/// Last client-reported position per user, expiring with the cache window.
pub struct RedisPositionSource {
    cache: Arc<RedisCache>,
}

impl RedisPositionSource {
    pub fn new(cache: Arc<RedisCache>) -> Self {
        Self { cache }
    }

    fn key(user_id: Uuid) -> String {
        format!("location:{}", user_id)
    }
}

#[async_trait]
impl PositionSource for RedisPositionSource {
    async fn latest(&self, user_id: Uuid) -> Result<Option<ReportedPosition>, LocationError> {
        self.cache
            .get::<ReportedPosition>(&Self::key(user_id))
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))
    }

    async fn report(
        &self,
        user_id: Uuid,
        reported: ReportedPosition,
        ttl: Duration,
    ) -> Result<(), LocationError> {
        self.cache
            .set(&Self::key(user_id), &reported, ttl.as_secs().max(1))
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))
    }
}
