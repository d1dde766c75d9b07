use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, TS)]
#[ts(export)]
pub struct OnboardingRequest {
    #[validate(length(min = 1, max = 50, message = "Display name must be 1 to 50 characters"))]
    pub display_name: Option<String>,
    /// Intent tags such as `find_partners`; unknown tags are rejected.
    #[validate(length(min = 1, max = 6, message = "Pick between 1 and 6 intents"))]
    pub intents: Vec<String>,
}
