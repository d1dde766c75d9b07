use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{
    rate_limit::{RateLimitKey, RateLimitRule, WindowState, repository::RateLimitStore},
    shared::errors::DomainError,
};

/// Windows kept as rows in `rate_limits`, one per (user, action).
pub struct SqlxRateLimitStore {
    pool: PgPool,
}

impl SqlxRateLimitStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn to_window((count, window_start, expires_at): (i32, DateTime<Utc>, DateTime<Utc>)) -> WindowState {
    WindowState {
        count: count.max(0) as u32,
        window_start,
        expires_at,
    }
}

#[async_trait]
impl RateLimitStore for SqlxRateLimitStore {
    async fn hit(
        &self,
        key: RateLimitKey,
        rule: RateLimitRule,
        now: DateTime<Utc>,
    ) -> Result<WindowState, DomainError> {
        // Single statement: create, increment, or restart an expired window.
        // Every CASE reads the pre-update row, so the three columns stay consistent.
        let row: (i32, DateTime<Utc>, DateTime<Utc>) = sqlx::query_as(
            "INSERT INTO rate_limits (user_id, action_type, count, window_start, expires_at)
             VALUES ($1, $2, 1, $3, $3 + make_interval(mins => $4))
             ON CONFLICT (user_id, action_type) DO UPDATE SET
                count = CASE WHEN rate_limits.expires_at <= EXCLUDED.window_start
                             THEN 1 ELSE rate_limits.count + 1 END,
                window_start = CASE WHEN rate_limits.expires_at <= EXCLUDED.window_start
                             THEN EXCLUDED.window_start ELSE rate_limits.window_start END,
                expires_at = CASE WHEN rate_limits.expires_at <= EXCLUDED.window_start
                             THEN EXCLUDED.expires_at ELSE rate_limits.expires_at END
             RETURNING count, window_start, expires_at",
        )
        .bind(key.user_id)
        .bind(key.action.as_str())
        .bind(now)
        .bind(rule.window_minutes as i32)
        .fetch_one(&self.pool)
        .await?;

        Ok(to_window(row))
    }

    async fn peek(
        &self,
        key: RateLimitKey,
        now: DateTime<Utc>,
    ) -> Result<Option<WindowState>, DomainError> {
        let row: Option<(i32, DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
            "SELECT count, window_start, expires_at FROM rate_limits
             WHERE user_id = $1 AND action_type = $2 AND expires_at > $3",
        )
        .bind(key.user_id)
        .bind(key.action.as_str())
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(to_window))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM rate_limits WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
