pub mod dto;
pub mod use_case;

pub use dto::OnboardingRequest;
pub use use_case::OnboardingUseCase;
