use crate::helpers::{
    expect_status, get_request, json_request, read_json, send, spawn_offline_app, token_for,
};
use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

#[tokio::test]
async fn scan_requires_a_token() {
    let test = spawn_offline_app();
    let req = json_request(
        "POST",
        "/api/v1/moderation/scan",
        None,
        json!({ "text": "hello" }),
    );

    expect_status(send(&test.app, req).await, StatusCode::UNAUTHORIZED).await;
}

#[tokio::test]
async fn scan_blocks_adult_domain_when_limiter_store_is_down() {
    let test = spawn_offline_app();
    let token = token_for(Uuid::now_v7());
    let req = json_request(
        "POST",
        "/api/v1/moderation/scan",
        Some(&token),
        json!({ "text": "beta for the crimp line at https://pornhub.com/watch" }),
    );

    let res = expect_status(send(&test.app, req).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["blocked"], true);
    assert_eq!(body["is_nsfw"], true);
    assert_eq!(body["action"], "blocked");
    assert!(
        body["urls"]
            .as_array()
            .is_some_and(|urls| !urls.is_empty())
    );
}

#[tokio::test]
async fn scan_allows_clean_beta() {
    let test = spawn_offline_app();
    let token = token_for(Uuid::now_v7());
    let req = json_request(
        "POST",
        "/api/v1/moderation/scan",
        Some(&token),
        json!({ "text": "Heel hook the arete then slap for the sloper." }),
    );

    let res = expect_status(send(&test.app, req).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["blocked"], false);
    assert_eq!(body["severity"], "safe");
}

#[tokio::test]
async fn scan_rejects_too_many_images() {
    let test = spawn_offline_app();
    let token = token_for(Uuid::now_v7());
    let images: Vec<String> = (0..11)
        .map(|i| format!("https://cdn.example.com/{}.jpg", i))
        .collect();
    let req = json_request(
        "POST",
        "/api/v1/moderation/scan",
        Some(&token),
        json!({ "text": "", "images": images }),
    );

    expect_status(send(&test.app, req).await, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn nearby_gyms_rejects_out_of_range_latitude() {
    let test = spawn_offline_app();
    let req = get_request("/api/v1/gyms/nearby?lat=200&lng=0", None);

    expect_status(send(&test.app, req).await, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn unknown_rate_limit_action_is_bad_request() {
    let test = spawn_offline_app();
    let token = token_for(Uuid::now_v7());
    let req = get_request("/api/v1/me/rate-limits/dyno", Some(&token));

    expect_status(send(&test.app, req).await, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn onboarding_rejects_unknown_intent() {
    let test = spawn_offline_app();
    let token = token_for(Uuid::now_v7());
    let req = json_request(
        "POST",
        "/api/v1/me/onboarding",
        Some(&token),
        json!({ "intents": ["find_partners", "sell_chalk"] }),
    );

    expect_status(send(&test.app, req).await, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn blank_post_is_rejected_before_any_lookup() {
    let test = spawn_offline_app();
    let token = token_for(Uuid::now_v7());
    let uri = format!("/api/v1/communities/{}/posts", Uuid::now_v7());
    let req = json_request("POST", &uri, Some(&token), json!({ "content": "   " }));

    expect_status(send(&test.app, req).await, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn location_report_rejects_invalid_coordinates() {
    let test = spawn_offline_app();
    let token = token_for(Uuid::now_v7());
    let req = json_request(
        "PUT",
        "/api/v1/me/location",
        Some(&token),
        json!({ "status": "granted", "latitude": 12.0, "longitude": 181.0 }),
    );

    expect_status(send(&test.app, req).await, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn current_location_reports_unavailable_without_cache() {
    let test = spawn_offline_app();
    let token = token_for(Uuid::now_v7());
    let req = get_request("/api/v1/me/location", Some(&token));

    let res = expect_status(send(&test.app, req).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["available"], false);
    assert!(body["reason"].is_string());
}

#[tokio::test]
async fn recommendations_degrade_to_empty_when_backends_are_down() {
    let test = spawn_offline_app();
    let token = token_for(Uuid::now_v7());

    for uri in [
        "/api/v1/recommendations/communities",
        "/api/v1/recommendations/gyms?lat=45.5&lng=-73.6",
    ] {
        let res = expect_status(send(&test.app, get_request(uri, Some(&token))).await, StatusCode::OK)
            .await;
        let body: Vec<Value> = read_json(res).await;
        assert!(body.is_empty(), "{} should be empty", uri);
    }
}

#[tokio::test]
async fn health_is_unavailable_without_database() {
    let test = spawn_offline_app();
    let res = expect_status(
        send(&test.app, get_request("/health", None)).await,
        StatusCode::SERVICE_UNAVAILABLE,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["database"], "down");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let test = spawn_offline_app();

    let generated = send(&test.app, get_request("/api/v1/gyms/nearby?lat=91&lng=0", None)).await;
    assert!(generated.headers().contains_key("x-request-id"));

    let mut req = get_request("/api/v1/gyms/nearby?lat=91&lng=0", None);
    req.headers_mut()
        .insert("x-request-id", "trace-abc".parse().expect("header value"));
    let echoed = send(&test.app, req).await;
    assert_eq!(
        echoed
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("trace-abc")
    );
}
