pub mod image_classifier;
pub mod nsfw_scanner;
pub mod rate_limiter;
