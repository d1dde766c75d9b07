use crate::presentation::http::state::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    cache: &'static str,
    version: &'static str,
}

/// Postgres is required; Redis being down only degrades caching.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (db, cache) = tokio::join!(
        sqlx::query("SELECT 1").execute(&state.db),
        state.cache.ping()
    );

    let database = match db {
        Ok(_) => "up",
        Err(e) => {
            tracing::error!("Health check failed: Database unreachable: {}", e);
            "down"
        }
    };
    let cache = match cache {
        Ok(_) => "up",
        Err(e) => {
            tracing::warn!("Health check: Redis unreachable: {}", e);
            "down"
        }
    };

    let (code, status) = match (database, cache) {
        ("up", "up") => (StatusCode::OK, "healthy"),
        ("up", _) => (StatusCode::OK, "degraded"),
        _ => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy"),
    };

    (
        code,
        Json(HealthResponse {
            status,
            database,
            cache,
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}
