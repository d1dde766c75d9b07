use chrono::{DateTime, Utc};
use std::{collections::HashMap, sync::Arc};
use uuid::Uuid;

use crate::domain::{
    rate_limit::{
        ActionType, RateLimitDecision, RateLimitKey, RateLimitRule, repository::RateLimitStore,
    },
    shared::failure_policy::FailurePolicy,
};

/// Limit, window and failure behaviour for one action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub rule: RateLimitRule,
    pub on_failure: FailurePolicy,
}

impl RateLimitPolicy {
    pub fn new(limit: u32, window_minutes: u32, on_failure: FailurePolicy) -> Self {
        Self {
            rule: RateLimitRule::new(limit, window_minutes),
            on_failure,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RateLimitPolicies {
    policies: HashMap<ActionType, RateLimitPolicy>,
}

impl Default for RateLimitPolicies {
    fn default() -> Self {
        Self::new()
            .with(ActionType::Post, RateLimitPolicy::new(10, 60, FailurePolicy::Open))
            .with(ActionType::Comment, RateLimitPolicy::new(30, 60, FailurePolicy::Open))
            .with(
                ActionType::JoinCommunity,
                RateLimitPolicy::new(20, 60, FailurePolicy::Open),
            )
            .with(
                ActionType::ModerationScan,
                RateLimitPolicy::new(60, 1, FailurePolicy::Open),
            )
    }
}

impl RateLimitPolicies {
    pub fn new() -> Self {
        Self {
            policies: HashMap::new(),
        }
    }

    pub fn with(mut self, action: ActionType, policy: RateLimitPolicy) -> Self {
        self.policies.insert(action, policy);
        self
    }

    pub fn get(&self, action: ActionType) -> Option<&RateLimitPolicy> {
        self.policies.get(&action)
    }
}

/// Fixed-window limiter over a [`RateLimitStore`].
///
/// Store errors never surface to the caller: the configured failure policy
/// turns them into a decision, and they are logged.
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    policies: RateLimitPolicies,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>, policies: RateLimitPolicies) -> Self {
        Self { store, policies }
    }

    pub fn policy(&self, action: ActionType) -> Option<&RateLimitPolicy> {
        self.policies.get(action)
    }

    /// Counts one action against the configured window.
    pub async fn check(&self, user_id: Uuid, action: ActionType) -> RateLimitDecision {
        self.check_at(user_id, action, Utc::now()).await
    }

    pub async fn check_at(
        &self,
        user_id: Uuid,
        action: ActionType,
        now: DateTime<Utc>,
    ) -> RateLimitDecision {
        match self.policies.get(action).copied() {
            Some(policy) => self.check_with(user_id, action, policy, now).await,
            None => {
                tracing::debug!(action = %action, "no rate limit configured, allowing");
                RateLimitDecision {
                    allowed: true,
                    remaining: u32::MAX,
                    reset_at: now,
                }
            }
        }
    }

    /// Counts one action against an explicit limit and window.
    pub async fn check_with(
        &self,
        user_id: Uuid,
        action: ActionType,
        policy: RateLimitPolicy,
        now: DateTime<Utc>,
    ) -> RateLimitDecision {
        let key = RateLimitKey::new(user_id, action);
        match self.store.hit(key, policy.rule, now).await {
            Ok(window) => {
                let decision = window.decide(&policy.rule);
                if !decision.allowed {
                    tracing::info!(
                        %user_id,
                        action = %action,
                        count = window.count,
                        limit = policy.rule.limit,
                        reset_at = %decision.reset_at,
                        "rate limit exceeded"
                    );
                }
                decision
            }
            Err(e) => {
                tracing::warn!(
                    %user_id,
                    action = %action,
                    error = %e,
                    policy = ?policy.on_failure,
                    "rate limit store failed"
                );
                failure_decision(&policy, now)
            }
        }
    }

    /// Reports the current window without consuming an action.
    pub async fn status(&self, user_id: Uuid, action: ActionType) -> RateLimitDecision {
        let now = Utc::now();
        let Some(policy) = self.policies.get(action).copied() else {
            return RateLimitDecision {
                allowed: true,
                remaining: u32::MAX,
                reset_at: now,
            };
        };

        match self.store.peek(RateLimitKey::new(user_id, action), now).await {
            Ok(Some(window)) => RateLimitDecision {
                allowed: window.count < policy.rule.limit,
                remaining: policy.rule.limit.saturating_sub(window.count),
                reset_at: window.expires_at,
            },
            Ok(None) => RateLimitDecision {
                allowed: policy.rule.limit > 0,
                remaining: policy.rule.limit,
                reset_at: now + policy.rule.window(),
            },
            Err(e) => {
                tracing::warn!(%user_id, action = %action, error = %e, "rate limit peek failed");
                failure_decision(&policy, now)
            }
        }
    }
}

fn failure_decision(policy: &RateLimitPolicy, now: DateTime<Utc>) -> RateLimitDecision {
    if policy.on_failure.allows_on_failure() {
        RateLimitDecision {
            allowed: true,
            remaining: policy.rule.limit,
            reset_at: now + policy.rule.window(),
        }
    } else {
        RateLimitDecision {
            allowed: false,
            remaining: 0,
            reset_at: now + policy.rule.window(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{rate_limit::repository::MockRateLimitStore, shared::errors::DomainError};
    use crate::infrastructure::repositories::memory_rate_limit_store::MemoryRateLimitStore;
    use chrono::Duration;

    fn limiter(store: Arc<dyn RateLimitStore>, policy: RateLimitPolicy) -> RateLimiter {
        RateLimiter::new(store, RateLimitPolicies::new().with(ActionType::Post, policy))
    }

    #[tokio::test]
    async fn fourth_call_in_window_is_denied_and_resets_later() {
        let limiter = limiter(
            Arc::new(MemoryRateLimitStore::new()),
            RateLimitPolicy::new(3, 60, FailurePolicy::Open),
        );
        let user = Uuid::now_v7();
        let start = Utc::now();

        for i in 0..3 {
            let d = limiter
                .check_at(user, ActionType::Post, start + Duration::seconds(i))
                .await;
            assert!(d.allowed, "call {} should be allowed", i + 1);
            assert_eq!(d.remaining, 2 - i as u32);
        }

        let denied = limiter
            .check_at(user, ActionType::Post, start + Duration::seconds(10))
            .await;
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        assert_eq!(denied.reset_at, start + Duration::minutes(60));

        let after_reset = limiter
            .check_at(user, ActionType::Post, denied.reset_at + Duration::seconds(1))
            .await;
        assert!(after_reset.allowed);
        assert_eq!(after_reset.remaining, 2);
        assert!(after_reset.reset_at > denied.reset_at);
    }

    #[tokio::test]
    async fn windows_are_per_user_and_action() {
        let store: Arc<dyn RateLimitStore> = Arc::new(MemoryRateLimitStore::new());
        let limiter = RateLimiter::new(
            store,
            RateLimitPolicies::new()
                .with(ActionType::Post, RateLimitPolicy::new(1, 60, FailurePolicy::Open))
                .with(ActionType::Comment, RateLimitPolicy::new(1, 60, FailurePolicy::Open)),
        );
        let alice = Uuid::now_v7();
        let bob = Uuid::now_v7();

        assert!(limiter.check(alice, ActionType::Post).await.allowed);
        assert!(!limiter.check(alice, ActionType::Post).await.allowed);
        assert!(limiter.check(alice, ActionType::Comment).await.allowed);
        assert!(limiter.check(bob, ActionType::Post).await.allowed);
    }

    #[tokio::test]
    async fn store_failure_fails_open_when_configured() {
        let mut store = MockRateLimitStore::new();
        store
            .expect_hit()
            .returning(|_, _, _| Err(DomainError::InfrastructureError("db down".into())));
        let limiter = limiter(
            Arc::new(store),
            RateLimitPolicy::new(3, 60, FailurePolicy::Open),
        );

        let decision = limiter.check(Uuid::now_v7(), ActionType::Post).await;
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 3);
    }

    #[tokio::test]
    async fn store_failure_fails_closed_when_configured() {
        let mut store = MockRateLimitStore::new();
        store
            .expect_hit()
            .returning(|_, _, _| Err(DomainError::InfrastructureError("db down".into())));
        let limiter = limiter(
            Arc::new(store),
            RateLimitPolicy::new(3, 60, FailurePolicy::Closed),
        );

        let decision = limiter.check(Uuid::now_v7(), ActionType::Post).await;
        assert!(!decision.allowed);
        assert_eq!(decision.remaining, 0);
    }

    #[tokio::test]
    async fn status_does_not_consume() {
        let limiter = limiter(
            Arc::new(MemoryRateLimitStore::new()),
            RateLimitPolicy::new(2, 60, FailurePolicy::Open),
        );
        let user = Uuid::now_v7();

        assert_eq!(limiter.status(user, ActionType::Post).await.remaining, 2);
        limiter.check(user, ActionType::Post).await;
        assert_eq!(limiter.status(user, ActionType::Post).await.remaining, 1);
        assert_eq!(limiter.status(user, ActionType::Post).await.remaining, 1);
    }

    #[tokio::test]
    async fn unconfigured_actions_pass() {
        let limiter = RateLimiter::new(Arc::new(MemoryRateLimitStore::new()), RateLimitPolicies::new());
        assert!(limiter.check(Uuid::now_v7(), ActionType::Comment).await.allowed);
    }
}
