use crate::domain::moderation::verdict::{ModerationAction, ModerationVerdict};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, TS)]
#[ts(export)]
pub struct ScanRequest {
    #[validate(length(max = 10000))]
    #[serde(default)]
    pub text: String,
    #[validate(length(max = 10))]
    pub images: Option<Vec<String>>,
}

impl ScanRequest {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            images: None,
        }
    }

    pub fn image_urls(&self) -> &[String] {
        self.images.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScanResponse {
    #[serde(flatten)]
    pub verdict: ModerationVerdict,
    pub action: ModerationAction,
    pub blocked: bool,
}
