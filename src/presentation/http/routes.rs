use super::{
    handlers::{communities, gyms, health, me, moderation, recommendations, social},
    middleware::request_id::request_id_middleware,
    state::AppState,
};
use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Moderation
        .route("/api/v1/moderation/scan", post(moderation::scan_content))
        // Communities
        .route("/api/v1/communities", get(communities::list_communities))
        .route("/api/v1/communities/{id}", get(communities::get_community))
        .route(
            "/api/v1/communities/{id}/members",
            post(communities::join_community).delete(communities::leave_community),
        )
        // Social
        .route(
            "/api/v1/communities/{id}/posts",
            post(social::create_post).get(social::list_posts),
        )
        .route(
            "/api/v1/posts/{id}/comments",
            post(social::add_comment).get(social::get_comments),
        )
        // Gyms
        .route("/api/v1/gyms/nearby", get(gyms::get_nearby_gyms))
        // Recommendations
        .route(
            "/api/v1/recommendations/communities",
            get(recommendations::recommend_communities),
        )
        .route(
            "/api/v1/recommendations/gyms",
            get(recommendations::recommend_gyms),
        )
        // User workspace
        .route("/api/v1/me", get(me::get_profile))
        .route("/api/v1/me/onboarding", post(me::complete_onboarding))
        .route(
            "/api/v1/me/location",
            put(me::report_location).get(me::current_location),
        )
        .route(
            "/api/v1/me/rate-limits/{action}",
            get(me::rate_limit_status),
        )
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
