pub mod redis_position_source;
pub mod service;

pub use service::{LocationError, LocationOptions, LocationService, PositionSource, ReportedPosition};
