pub mod community;
pub mod geo;
pub mod gym;
pub mod intent;
pub mod moderation;
pub mod profile;
pub mod rate_limit;
pub mod recommendation;
pub mod shared;
pub mod social;
