use crate::domain::{
    moderation::repository::{ModerationLogEntry, ModerationLogRepository},
    shared::errors::DomainError,
};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

pub struct SqlxModerationLogRepository {
    pub pool: PgPool,
}

impl SqlxModerationLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ModerationLogRepository for SqlxModerationLogRepository {
    async fn record(&self, entry: ModerationLogEntry) -> Result<Uuid, DomainError> {
        let id = Uuid::now_v7();
        sqlx::query(
            "INSERT INTO moderation_logs (
                id, user_id, content_kind, content_excerpt, is_nsfw, confidence,
                severity, keywords, urls, action
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(id)
        .bind(entry.user_id)
        .bind(entry.content_kind.as_str())
        .bind(&entry.content_excerpt)
        .bind(entry.verdict.is_nsfw)
        .bind(entry.verdict.confidence)
        .bind(entry.verdict.severity.as_str())
        .bind(&entry.verdict.keywords)
        .bind(&entry.verdict.urls)
        .bind(entry.action.as_str())
        .execute(&self.pool)
        .await?;
        Ok(id)
    }
}
