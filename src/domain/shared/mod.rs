pub mod errors;
pub mod failure_policy;
pub mod pagination;
