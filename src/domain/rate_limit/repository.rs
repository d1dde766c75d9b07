use super::window::{RateLimitKey, RateLimitRule, WindowState};
use crate::domain::shared::errors::DomainError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage for fixed rate-limit windows.
///
/// `hit` must apply [`WindowState::advance`] atomically: two concurrent hits on
/// the same key may never observe the same count.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    async fn hit(
        &self,
        key: RateLimitKey,
        rule: RateLimitRule,
        now: DateTime<Utc>,
    ) -> Result<WindowState, DomainError>;

    /// Current window without counting a hit.
    async fn peek(
        &self,
        key: RateLimitKey,
        now: DateTime<Utc>,
    ) -> Result<Option<WindowState>, DomainError>;

    /// Deletes expired windows, returning how many went.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;
}
