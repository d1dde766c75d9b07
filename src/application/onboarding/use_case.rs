use super::dto::OnboardingRequest;
use crate::domain::{
    intent::parse_intents,
    profile::{Profile, ProfileRepository},
    shared::errors::DomainError,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Records the intent set chosen at onboarding. Intents are written once.
pub struct OnboardingUseCase {
    profiles: Arc<dyn ProfileRepository>,
}

impl OnboardingUseCase {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    pub async fn complete(
        &self,
        user_id: Uuid,
        request: OnboardingRequest,
    ) -> Result<Profile, DomainError> {
        let intents = parse_intents(&request.intents)?;
        if intents.is_empty() {
            return Err(DomainError::ValidationError(
                "At least one intent is required".into(),
            ));
        }

        let display_name = request
            .display_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        let profile = self
            .profiles
            .complete_onboarding(user_id, display_name, &intents)
            .await?;
        info!(%user_id, intents = ?profile.intents, "onboarding completed");
        Ok(profile)
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<Profile, DomainError> {
        self.profiles
            .find(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("profile {}", user_id)))
    }
}
