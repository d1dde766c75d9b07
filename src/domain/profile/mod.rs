use crate::domain::{intent::UserIntent, shared::errors::DomainError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Profile {
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub intents: Vec<UserIntent>,
    pub onboarded_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn is_onboarded(&self) -> bool {
        self.onboarded_at.is_some()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find(&self, user_id: Uuid) -> Result<Option<Profile>, DomainError>;
    /// Writes the intent set once. Returns `Conflict` if the profile is already onboarded.
    async fn complete_onboarding(
        &self,
        user_id: Uuid,
        display_name: Option<String>,
        intents: &[UserIntent],
    ) -> Result<Profile, DomainError>;
}
