pub mod dto;
pub mod use_case;

pub use dto::{AddCommentRequest, CreatePostRequest};
pub use use_case::{SocialUseCase, SubmissionError};
