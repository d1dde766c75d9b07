use super::dto::{AddCommentRequest, CreatePostRequest};
use crate::{
    application::moderate_content::{ModerateContentUseCase, ScanRequest},
    domain::{
        community::{entity::Membership, repository::CommunityRepository},
        moderation::{repository::ContentKind, verdict::ModerationAction, verdict::ModerationVerdict},
        rate_limit::{ActionType, RateLimitDecision},
        shared::{errors::DomainError, pagination::PaginationRequest},
        social::{
            comment::{Comment, NewComment},
            post::{NewPost, Post},
            repository::SocialRepository,
        },
    },
    infrastructure::security::rate_limiter::RateLimiter,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;

/// Why a post, comment or join was refused.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("rate limit exceeded for {action}")]
    RateLimited {
        action: ActionType,
        decision: RateLimitDecision,
    },
    #[error("content blocked by moderation")]
    Blocked(ModerationVerdict),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Submit pipeline: rate limit, then moderation, then persistence.
pub struct SocialUseCase {
    social: Arc<dyn SocialRepository>,
    communities: Arc<dyn CommunityRepository>,
    limiter: Arc<RateLimiter>,
    moderation: Arc<ModerateContentUseCase>,
}

impl SocialUseCase {
    pub fn new(
        social: Arc<dyn SocialRepository>,
        communities: Arc<dyn CommunityRepository>,
        limiter: Arc<RateLimiter>,
        moderation: Arc<ModerateContentUseCase>,
    ) -> Self {
        Self {
            social,
            communities,
            limiter,
            moderation,
        }
    }

    async fn enforce_limit(&self, user_id: Uuid, action: ActionType) -> Result<(), SubmissionError> {
        let decision = self.limiter.check(user_id, action).await;
        if decision.allowed {
            Ok(())
        } else {
            Err(SubmissionError::RateLimited { action, decision })
        }
    }

    async fn require_member(&self, community_id: Uuid, user_id: Uuid) -> Result<(), DomainError> {
        let community = self
            .communities
            .find_by_id(community_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| DomainError::NotFound(format!("community {}", community_id)))?;
        if !self.communities.is_member(community.id, user_id).await? {
            return Err(DomainError::Unauthorized);
        }
        Ok(())
    }

    #[instrument(skip(self, request), fields(%user_id, %community_id))]
    pub async fn create_post(
        &self,
        user_id: Uuid,
        community_id: Uuid,
        request: CreatePostRequest,
    ) -> Result<Post, SubmissionError> {
        self.require_member(community_id, user_id).await?;
        self.enforce_limit(user_id, ActionType::Post).await?;

        let scan = ScanRequest {
            text: request.content,
            images: Some(request.image_urls),
        };
        let outcome = self.moderation.review(user_id, ContentKind::Post, &scan).await;
        if outcome.is_blocked() {
            info!(severity = outcome.verdict.severity.as_str(), "post blocked");
            return Err(SubmissionError::Blocked(outcome.verdict));
        }

        let post = self
            .social
            .create_post(NewPost {
                community_id,
                author_id: user_id,
                content: scan.text,
                image_urls: scan.images.unwrap_or_default(),
                needs_review: outcome.action == ModerationAction::Flagged,
            })
            .await?;
        Ok(post)
    }

    pub async fn list_posts(
        &self,
        community_id: Uuid,
        page: PaginationRequest,
    ) -> Result<Vec<Post>, DomainError> {
        self.social.list_posts(community_id, &page.normalized()).await
    }

    #[instrument(skip(self, request), fields(%user_id, %post_id))]
    pub async fn add_comment(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        request: AddCommentRequest,
    ) -> Result<Comment, SubmissionError> {
        let post = self
            .social
            .find_post(post_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post {}", post_id)))?;
        self.require_member(post.community_id, user_id).await?;
        self.enforce_limit(user_id, ActionType::Comment).await?;

        let scan = ScanRequest::text(request.content);
        let outcome = self
            .moderation
            .review(user_id, ContentKind::Comment, &scan)
            .await;
        if outcome.is_blocked() {
            info!(severity = outcome.verdict.severity.as_str(), "comment blocked");
            return Err(SubmissionError::Blocked(outcome.verdict));
        }

        let comment = self
            .social
            .add_comment(NewComment {
                post_id,
                author_id: user_id,
                content: scan.text,
                needs_review: outcome.action == ModerationAction::Flagged,
            })
            .await?;
        Ok(comment)
    }

    pub async fn get_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        if self.social.find_post(post_id).await?.is_none() {
            return Err(DomainError::NotFound(format!("post {}", post_id)));
        }
        self.social.get_comments(post_id).await
    }

    #[instrument(skip(self), fields(%user_id, %community_id))]
    pub async fn join(&self, user_id: Uuid, community_id: Uuid) -> Result<Membership, SubmissionError> {
        self.communities
            .find_by_id(community_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| DomainError::NotFound(format!("community {}", community_id)))?;
        self.enforce_limit(user_id, ActionType::JoinCommunity).await?;
        Ok(self.communities.join(community_id, user_id).await?)
    }

    /// Returns whether a membership existed.
    pub async fn leave(&self, user_id: Uuid, community_id: Uuid) -> Result<bool, DomainError> {
        self.communities.leave(community_id, user_id).await
    }
}
