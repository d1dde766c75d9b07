use super::verdict::{ModerationAction, ModerationVerdict};
use crate::domain::shared::errors::DomainError;
use async_trait::async_trait;
use uuid::Uuid;

/// Which kind of submission a verdict was produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Post,
    Comment,
    Scan,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Post => "post",
            ContentKind::Comment => "comment",
            ContentKind::Scan => "scan",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModerationLogEntry {
    pub user_id: Uuid,
    pub content_kind: ContentKind,
    pub content_excerpt: String,
    pub verdict: ModerationVerdict,
    pub action: ModerationAction,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModerationLogRepository: Send + Sync {
    async fn record(&self, entry: ModerationLogEntry) -> Result<Uuid, DomainError>;
}
