use super::entity::Gym;
use crate::domain::shared::errors::DomainError;
use async_trait::async_trait;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GymRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Gym>, DomainError>;
    /// Every gym, hidden ones included; callers filter.
    async fn list_all(&self) -> Result<Vec<Gym>, DomainError>;
    /// Gyms linked to communities the user belongs to.
    async fn member_gym_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, DomainError>;
}
