pub mod repository;
pub mod window;

pub use window::{ActionType, RateLimitDecision, RateLimitKey, RateLimitRule, WindowState};
