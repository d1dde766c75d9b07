use super::entity::{Community, Membership};
use crate::domain::shared::errors::DomainError;
use async_trait::async_trait;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommunityRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Community>, DomainError>;
    async fn list_active(&self) -> Result<Vec<Community>, DomainError>;
    /// Every community, including inactive ones; the scorer does its own exclusion.
    async fn list_candidates(&self) -> Result<Vec<Community>, DomainError>;
    async fn join(&self, community_id: Uuid, user_id: Uuid) -> Result<Membership, DomainError>;
    async fn leave(&self, community_id: Uuid, user_id: Uuid) -> Result<bool, DomainError>;
    async fn is_member(&self, community_id: Uuid, user_id: Uuid) -> Result<bool, DomainError>;
    async fn member_community_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, DomainError>;
}
