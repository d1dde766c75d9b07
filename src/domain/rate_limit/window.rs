use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use ts_rs::TS;
use uuid::Uuid;

use crate::domain::shared::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ActionType {
    Post,
    Comment,
    JoinCommunity,
    ModerationScan,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Post => "post",
            ActionType::Comment => "comment",
            ActionType::JoinCommunity => "join_community",
            ActionType::ModerationScan => "moderation_scan",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post" => Ok(ActionType::Post),
            "comment" => Ok(ActionType::Comment),
            "join_community" => Ok(ActionType::JoinCommunity),
            "moderation_scan" => Ok(ActionType::ModerationScan),
            other => Err(DomainError::ValidationError(format!(
                "Unknown action type: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RateLimitKey {
    pub user_id: Uuid,
    pub action: ActionType,
}

impl RateLimitKey {
    pub fn new(user_id: Uuid, action: ActionType) -> Self {
        Self { user_id, action }
    }
}

/// N actions per W minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRule {
    pub limit: u32,
    pub window_minutes: u32,
}

impl RateLimitRule {
    pub fn new(limit: u32, window_minutes: u32) -> Self {
        Self {
            limit,
            window_minutes: window_minutes.max(1),
        }
    }

    pub fn window(&self) -> Duration {
        Duration::minutes(i64::from(self.window_minutes))
    }
}

/// A persisted window as it stands after the latest hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowState {
    pub count: u32,
    pub window_start: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl WindowState {
    pub fn fresh(now: DateTime<Utc>, rule: &RateLimitRule) -> Self {
        Self {
            count: 1,
            window_start: now,
            expires_at: now + rule.window(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// The state after one more hit at `now`.
    ///
    /// Expired windows restart at count 1. Hits past the limit still count so the
    /// decision can be made from the returned row alone.
    pub fn advance(self, now: DateTime<Utc>, rule: &RateLimitRule) -> Self {
        if self.is_expired(now) {
            Self::fresh(now, rule)
        } else {
            Self {
                count: self.count.saturating_add(1),
                ..self
            }
        }
    }

    pub fn decide(&self, rule: &RateLimitRule) -> RateLimitDecision {
        RateLimitDecision {
            allowed: self.count <= rule.limit,
            remaining: rule.limit.saturating_sub(self.count),
            reset_at: self.expires_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}
