pub mod dto;
pub mod use_case;

pub use dto::RecommendationQuery;
pub use use_case::RecommendUseCase;
