pub mod dto;
pub mod use_case;

pub use dto::{ScanRequest, ScanResponse};
pub use use_case::{ModerateContentUseCase, ModerationOutcome, ModerationPolicy};
