pub mod communities;
pub mod gyms;
pub mod health;
pub mod me;
pub mod moderation;
pub mod recommendations;
pub mod social;
