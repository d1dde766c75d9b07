pub mod cache;
pub mod database;
pub mod location;
pub mod repositories;
pub mod security;
