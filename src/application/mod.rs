pub mod moderate_content;
pub mod onboarding;
pub mod recommend;
pub mod social;
