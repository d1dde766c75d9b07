use crate::helpers::{
    expect_status, get_request, json_request, read_json, send, spawn_app, token_for,
};
use axum::http::{StatusCode, header};
use chrono::{DateTime, Duration, Utc};
use cragline::{
    domain::rate_limit::{
        ActionType, RateLimitKey, RateLimitRule, repository::RateLimitStore,
    },
    infrastructure::repositories::sqlx_rate_limit_store::SqlxRateLimitStore,
};
use futures_util::future::join_all;
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

async fn seed_gym_community(db: &PgPool) -> (Uuid, Uuid) {
    let gym_id = Uuid::now_v7();
    let community_id = Uuid::now_v7();

    sqlx::query(
        "INSERT INTO gyms (id, name, latitude, longitude, city, country, facilities)
         VALUES ($1, $2, 45.5017, -73.5673, 'Montreal', 'CA', ARRAY['bouldering', 'cafe'])",
    )
    .bind(gym_id)
    .bind(format!("Bloc Shop {}", gym_id))
    .execute(db)
    .await
    .expect("failed to seed gym");

    sqlx::query(
        "INSERT INTO communities (id, name, description, gym_id)
         VALUES ($1, $2, 'Tuesday night crew', $3)",
    )
    .bind(community_id)
    .bind(format!("Crimp Club {}", community_id))
    .bind(gym_id)
    .execute(db)
    .await
    .expect("failed to seed community");

    (gym_id, community_id)
}

async fn cleanup(db: &PgPool, gym_id: Uuid, community_id: Uuid, user_id: Uuid) {
    let _ = sqlx::query("DELETE FROM communities WHERE id = $1")
        .bind(community_id)
        .execute(db)
        .await;
    let _ = sqlx::query("DELETE FROM gyms WHERE id = $1")
        .bind(gym_id)
        .execute(db)
        .await;
    for table in ["rate_limits", "moderation_logs", "profiles"] {
        let _ = sqlx::query(&format!("DELETE FROM {} WHERE user_id = $1", table))
            .bind(user_id)
            .execute(db)
            .await;
    }
}

#[tokio::test]
async fn post_pipeline_moderates_and_rate_limits() {
    let Some(test) = spawn_app().await else {
        return;
    };
    let (gym_id, community_id) = seed_gym_community(&test.db).await;
    let user_id = Uuid::now_v7();
    let token = token_for(user_id);
    let posts_uri = format!("/api/v1/communities/{}/posts", community_id);

    // Not a member yet
    let res = send(
        &test.app,
        json_request("POST", &posts_uri, Some(&token), json!({ "content": "hi" })),
    )
    .await;
    expect_status(res, StatusCode::FORBIDDEN).await;

    let join_uri = format!("/api/v1/communities/{}/members", community_id);
    let res = send(&test.app, json_request("POST", &join_uri, Some(&token), json!({}))).await;
    expect_status(res, StatusCode::CREATED).await;

    let res = send(
        &test.app,
        json_request(
            "POST",
            &posts_uri,
            Some(&token),
            json!({ "content": "Sent the purple V5 tonight!" }),
        ),
    )
    .await;
    let post: Value = read_json(expect_status(res, StatusCode::CREATED).await).await;
    assert_eq!(post["needs_review"], false);

    let res = send(
        &test.app,
        json_request(
            "POST",
            &posts_uri,
            Some(&token),
            json!({ "content": "better beta at pornhub.com" }),
        ),
    )
    .await;
    let blocked: Value = read_json(expect_status(res, StatusCode::UNPROCESSABLE_ENTITY).await).await;
    assert_eq!(blocked["verdict"]["is_nsfw"], true);

    let logged: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM moderation_logs WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&test.db)
            .await
            .expect("failed to count moderation logs");
    assert_eq!(logged, 1);

    let res = send(
        &test.app,
        json_request("POST", &posts_uri, Some(&token), json!({ "content": "Rest day." })),
    )
    .await;
    expect_status(res, StatusCode::CREATED).await;

    // Three attempts used, blocked one included
    let res = send(
        &test.app,
        json_request("POST", &posts_uri, Some(&token), json!({ "content": "One more" })),
    )
    .await;
    let res = expect_status(res, StatusCode::TOO_MANY_REQUESTS).await;
    assert!(res.headers().contains_key(header::RETRY_AFTER));

    let res = send(&test.app, get_request(&posts_uri, None)).await;
    let listed: Vec<Value> = read_json(expect_status(res, StatusCode::OK).await).await;
    assert_eq!(listed.len(), 2);

    cleanup(&test.db, gym_id, community_id, user_id).await;
}

#[tokio::test]
async fn onboarding_is_written_once_and_joined_communities_are_not_recommended() {
    let Some(test) = spawn_app().await else {
        return;
    };
    let (gym_id, community_id) = seed_gym_community(&test.db).await;
    let user_id = Uuid::now_v7();
    let token = token_for(user_id);

    let onboarding = json!({ "display_name": "Sloper Sam", "intents": ["join_communities", "discover_gyms"] });
    let res = send(
        &test.app,
        json_request("POST", "/api/v1/me/onboarding", Some(&token), onboarding.clone()),
    )
    .await;
    expect_status(res, StatusCode::CREATED).await;

    let res = send(
        &test.app,
        json_request("POST", "/api/v1/me/onboarding", Some(&token), onboarding),
    )
    .await;
    expect_status(res, StatusCode::CONFLICT).await;

    let id = community_id.to_string();

    let join_uri = format!("/api/v1/communities/{}/members", community_id);
    let res = send(&test.app, json_request("POST", &join_uri, Some(&token), json!({}))).await;
    expect_status(res, StatusCode::CREATED).await;

    let res = send(
        &test.app,
        get_request("/api/v1/recommendations/communities?limit=50", Some(&token)),
    )
    .await;
    let after: Vec<Value> = read_json(expect_status(res, StatusCode::OK).await).await;
    assert!(after.iter().all(|c| c["id"] != id.as_str()));

    let res = send(
        &test.app,
        get_request("/api/v1/gyms/nearby?lat=45.50&lng=-73.57&radius_km=5", None),
    )
    .await;
    let nearby: Vec<Value> = read_json(expect_status(res, StatusCode::OK).await).await;
    assert!(nearby.iter().any(|g| g["id"] == gym_id.to_string().as_str()));

    cleanup(&test.db, gym_id, community_id, user_id).await;
}

#[tokio::test]
async fn concurrent_window_hits_never_share_a_count() {
    let Some(test) = spawn_app().await else {
        return;
    };
    let store = SqlxRateLimitStore::new(test.db.clone());
    let user_id = Uuid::now_v7();
    let key = RateLimitKey::new(user_id, ActionType::Comment);
    let rule = RateLimitRule::new(100, 60);
    // Whole seconds so the stored timestamps compare exactly.
    let now = DateTime::from_timestamp(Utc::now().timestamp(), 0).expect("valid timestamp");

    const HITS: u32 = 12;
    let results = join_all((0..HITS).map(|_| store.hit(key, rule, now))).await;
    let mut counts: Vec<u32> = results
        .into_iter()
        .map(|r| r.expect("hit failed").count)
        .collect();
    counts.sort_unstable();
    assert_eq!(counts, (1..=HITS).collect::<Vec<_>>());

    let window = store
        .peek(key, now)
        .await
        .expect("peek failed")
        .expect("window missing");
    assert_eq!(window.count, HITS);
    assert_eq!(window.window_start, now);
    assert_eq!(window.expires_at, now + rule.window());

    // Past the window the same row restarts at one.
    let later = window.expires_at + Duration::seconds(1);
    let restarted = store.hit(key, rule, later).await.expect("hit failed");
    assert_eq!(restarted.count, 1);
    assert_eq!(restarted.window_start, later);
    assert_eq!(restarted.expires_at, later + rule.window());

    let rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM rate_limits WHERE user_id = $1 AND action_type = $2",
    )
    .bind(user_id)
    .bind(ActionType::Comment.as_str())
    .fetch_one(&test.db)
    .await
    .expect("failed to count windows");
    assert_eq!(rows, 1);

    let _ = sqlx::query("DELETE FROM rate_limits WHERE user_id = $1")
        .bind(user_id)
        .execute(&test.db)
        .await;
}
