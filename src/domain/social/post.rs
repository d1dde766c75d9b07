use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, TS, sqlx::FromRow)]
#[ts(export)]
pub struct Post {
    pub id: Uuid,
    pub community_id: Uuid,
    pub author_id: Uuid,
    pub author_name: Option<String>,
    pub content: String,
    pub image_urls: Vec<String>,
    /// Let through by moderation but worth a human look.
    pub needs_review: bool,
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub community_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub image_urls: Vec<String>,
    pub needs_review: bool,
}
