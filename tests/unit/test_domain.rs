use chrono::{Duration, Utc};
use cragline::domain::{
    community::entity::Community,
    geo::{Coordinates, format_distance, haversine_km},
    intent::UserIntent,
    rate_limit::{RateLimitRule, WindowState},
    recommendation::{ScoringContext, recommend},
    shared::pagination::PaginationRequest,
};
use uuid::Uuid;

#[test]
fn distance_labels_match_display_rules() {
    assert_eq!(format_distance(0.5), "500m");
    assert_eq!(format_distance(4.2), "4.2km");
    assert_eq!(format_distance(120.0), "120km");
}

#[test]
fn haversine_is_symmetric_and_zero_on_identity() {
    let fontainebleau = Coordinates::new(48.4047, 2.7016);
    let kalymnos = Coordinates::new(36.9500, 26.9833);
    assert_eq!(haversine_km(fontainebleau, fontainebleau), 0.0);
    let there = haversine_km(fontainebleau, kalymnos);
    let back = haversine_km(kalymnos, fontainebleau);
    assert!((there - back).abs() < 1e-9);
    assert!(there > 2000.0 && there < 2300.0);
}

#[test]
fn three_per_window_then_denied_then_fresh_after_reset() {
    let rule = RateLimitRule::new(3, 60);
    let start = Utc::now();

    let mut window = WindowState::fresh(start, &rule);
    assert!(window.decide(&rule).allowed);
    for _ in 0..2 {
        window = window.advance(start + Duration::minutes(1), &rule);
        assert!(window.decide(&rule).allowed);
    }

    window = window.advance(start + Duration::minutes(2), &rule);
    let denied = window.decide(&rule);
    assert!(!denied.allowed);
    assert_eq!(denied.remaining, 0);

    let after_reset = denied.reset_at + Duration::seconds(1);
    window = window.advance(after_reset, &rule);
    let fresh = window.decide(&rule);
    assert!(fresh.allowed);
    assert_eq!(window.count, 1);
    assert_eq!(fresh.remaining, 2);
    assert_eq!(window.window_start, after_reset);
}

fn community(name: &str) -> Community {
    Community {
        id: Uuid::now_v7(),
        name: name.into(),
        description: None,
        member_count: 50,
        gym_id: None,
        gym_latitude: None,
        gym_longitude: None,
        is_active: true,
        upcoming_event_count: 0,
        created_at: Utc::now(),
    }
}

#[test]
fn member_communities_never_appear_in_recommendations() {
    let candidates: Vec<Community> = (0..8).map(|i| community(&format!("Crew {i}"))).collect();
    let excluded = candidates.iter().step_by(2).map(|c| c.id).collect();
    let ctx = ScoringContext {
        intents: vec![UserIntent::JoinCommunities],
        location: None,
        excluded,
    };

    let ranked = recommend(candidates, &ctx, 50);
    assert_eq!(ranked.len(), 4);
    assert!(ranked.iter().all(|c| !ctx.excluded.contains(&c.entity.id)));
}

#[test]
fn pagination_defaults_are_safe_and_stable() {
    let p = PaginationRequest::default();
    assert_eq!(p.limit, 50);
    assert_eq!(p.offset, 0);

    let wild = PaginationRequest {
        limit: 10_000,
        offset: -3,
    }
    .normalized();
    assert_eq!(wild.limit, 100);
    assert_eq!(wild.offset, 0);
}
