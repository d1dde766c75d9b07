use cragline::{
    domain::moderation::verdict::Severity,
    infrastructure::security::nsfw_scanner::NsfwScanner,
};

#[test]
fn plain_beta_is_safe() {
    let verdict = NsfwScanner::new().scan_text("Drop knee on the arete, then match the sloper.");
    assert!(!verdict.is_nsfw);
    assert_eq!(verdict.confidence, 0.0);
    assert_eq!(verdict.severity, Severity::Safe);
    assert!(verdict.keywords.is_empty());
    assert!(verdict.urls.is_empty());
}

#[test]
fn bare_denylisted_domain_trips_the_scanner() {
    let verdict = NsfwScanner::new().scan_text("pornhub");
    assert!(verdict.is_nsfw);
    assert!(verdict.confidence >= 0.85);
}

#[test]
fn leetspeak_scans_like_plain_text() {
    let scanner = NsfwScanner::new();
    let leet = scanner.scan_text("p0rn");
    let plain = scanner.scan_text("porn");
    assert_eq!(leet.is_nsfw, plain.is_nsfw);
    assert_eq!(leet.confidence, plain.confidence);
    assert_eq!(leet.keywords, plain.keywords);
}

#[test]
fn explicit_link_in_a_post() {
    let verdict = NsfwScanner::new().scan_text("Check out https://pornhub.com/x");
    assert!(verdict.is_nsfw);
    assert!(verdict.confidence >= 0.85);
    assert_eq!(verdict.severity, Severity::Explicit);
    assert_eq!(verdict.urls, vec!["https://pornhub.com/x".to_string()]);
}

#[test]
fn extra_keywords_extend_the_list() {
    let scanner = NsfwScanner::new().with_extra_keywords(["spamcrimp"]);
    assert!(scanner.scan_text("buy spamcrimp now").is_nsfw);
    assert!(!NsfwScanner::new().scan_text("buy spamcrimp now").is_nsfw);
}
