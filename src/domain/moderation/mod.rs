pub mod repository;
pub mod verdict;
