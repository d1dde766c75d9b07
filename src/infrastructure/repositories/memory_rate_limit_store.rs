use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{collections::HashMap, sync::Mutex};

use crate::domain::{
    rate_limit::{RateLimitKey, RateLimitRule, WindowState, repository::RateLimitStore},
    shared::errors::DomainError,
};

/// Process-local windows, for single-instance deployments and tests.
#[derive(Default)]
pub struct MemoryRateLimitStore {
    windows: Mutex<HashMap<RateLimitKey, WindowState>>,
}

impl MemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<RateLimitKey, WindowState>>, DomainError> {
        self.windows
            .lock()
            .map_err(|_| DomainError::InfrastructureError("rate limit store poisoned".into()))
    }
}

#[async_trait]
impl RateLimitStore for MemoryRateLimitStore {
    async fn hit(
        &self,
        key: RateLimitKey,
        rule: RateLimitRule,
        now: DateTime<Utc>,
    ) -> Result<WindowState, DomainError> {
        let mut windows = self.lock()?;
        let next = match windows.get(&key) {
            Some(window) => window.advance(now, &rule),
            None => WindowState::fresh(now, &rule),
        };
        windows.insert(key, next);
        Ok(next)
    }

    async fn peek(
        &self,
        key: RateLimitKey,
        now: DateTime<Utc>,
    ) -> Result<Option<WindowState>, DomainError> {
        let windows = self.lock()?;
        Ok(windows.get(&key).copied().filter(|w| !w.is_expired(now)))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut windows = self.lock()?;
        let before = windows.len();
        windows.retain(|_, w| !w.is_expired(now));
        Ok((before - windows.len()) as u64)
    }
}
