use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, TS)]
#[ts(export)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 5000, message = "Post must be 1 to 5000 characters"))]
    pub content: String,
    #[validate(length(max = 4, message = "At most 4 images per post"))]
    #[serde(default)]
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, TS)]
#[ts(export)]
pub struct AddCommentRequest {
    #[validate(length(min = 1, max = 500, message = "Comment must be 1 to 500 characters"))]
    pub content: String,
}
