use lazy_static::lazy_static;
use regex::Regex;

use crate::domain::moderation::verdict::{ModerationVerdict, Severity};

/// Confidence for a URL on a denylisted domain.
pub const DENYLIST_CONFIDENCE: f32 = 0.95;
/// Confidence for a URL that only matches a suspicious pattern.
pub const PATTERN_CONFIDENCE: f32 = 0.85;
/// Keyword confidence never reaches certainty on its own.
pub const KEYWORD_CONFIDENCE_CAP: f32 = 0.95;
const KEYWORDS_FOR_CAP: f32 = 3.0;

const NSFW_KEYWORDS: &[&str] = &[
    "porn",
    "nsfw",
    "nude",
    "naked",
    "xxx",
    "hentai",
    "onlyfans",
    "camgirl",
    "escort",
    "erotic",
    "fetish",
    "blowjob",
    "orgasm",
    "boobs",
    "pussy",
    "milf",
    "sexting",
];

const DENYLISTED_DOMAINS: &[&str] = &[
    "pornhub",
    "xvideos",
    "xnxx",
    "xhamster",
    "redtube",
    "youporn",
    "onlyfans",
    "chaturbate",
    "brazzers",
    "spankbang",
    "fansly",
];

const LEET_TABLE: &[(char, char)] = &[
    ('0', 'o'),
    ('1', 'i'),
    ('3', 'e'),
    ('4', 'a'),
    ('5', 's'),
    ('7', 't'),
    ('8', 'b'),
    ('@', 'a'),
    ('$', 's'),
    ('!', 'i'),
    ('|', 'l'),
];

lazy_static! {
    static ref URL_REGEX: Regex =
        Regex::new(r#"(?i)\b(?:https?://|www\.)[^\s<>"']+"#).unwrap();
    /// Applied to the host only, never the path or query.
    static ref HOST_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\.xxx$").unwrap(),
        Regex::new(r"(?:^|\.)(?:porn|xxx|sex|nsfw|adult)[a-z0-9-]*\.[a-z0-9.-]*[a-z]{2,}$").unwrap(),
    ];
}

/// Lowercase, punctuation to spaces, whitespace collapsed.
pub fn normalize_text(input: &str) -> String {
    let mut normalized = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_alphanumeric() || ch.is_whitespace() {
            normalized.extend(ch.to_lowercase());
        } else {
            normalized.push(' ');
        }
    }
    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Undoes common digit/symbol substitutions, then normalizes.
pub fn normalize_leetspeak(input: &str) -> String {
    let substituted: String = input
        .to_lowercase()
        .chars()
        .map(|ch| {
            LEET_TABLE
                .iter()
                .find(|(from, _)| *from == ch)
                .map(|(_, to)| *to)
                .unwrap_or(ch)
        })
        .collect();
    normalize_text(&substituted)
}

/// Lowercased host of a URL-like string: scheme, credentials, `www.` and
/// everything from the first `/`, `?`, `#` or `:` dropped.
pub fn url_host(url: &str) -> String {
    let lowered = url.trim().to_lowercase();
    let rest = lowered
        .split_once("://")
        .map_or(lowered.as_str(), |(_, rest)| rest);
    let authority = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host)
        .split(':')
        .next()
        .unwrap_or_default();
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

/// URL-looking substrings, with trailing sentence punctuation trimmed.
pub fn extract_urls(text: &str) -> Vec<String> {
    URL_REGEX
        .find_iter(text)
        .map(|m| {
            m.as_str()
                .trim_end_matches(['.', ',', ';', ':', '!', '?', ')', ']'])
                .to_string()
        })
        .filter(|u| !u.is_empty())
        .collect()
}

/// Keyword and URL heuristics for explicit content.
///
/// Pure and synchronous; image classification is layered on top by the
/// moderation use case.
#[derive(Debug, Clone)]
pub struct NsfwScanner {
    keywords: Vec<String>,
    domains: Vec<String>,
}

impl Default for NsfwScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl NsfwScanner {
    pub fn new() -> Self {
        Self {
            keywords: NSFW_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            domains: DENYLISTED_DOMAINS.iter().map(|d| d.to_string()).collect(),
        }
    }

    /// Adds deployment-specific keywords on top of the built-in list.
    pub fn with_extra_keywords<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for keyword in extra {
            let keyword = normalize_text(keyword.as_ref());
            if !keyword.is_empty() && !self.keywords.contains(&keyword) {
                self.keywords.push(keyword);
            }
        }
        self
    }

    /// Confidence for a single URL, or `None` if it looks harmless.
    pub fn match_url(&self, url: &str) -> Option<f32> {
        let lowered = url.to_lowercase();
        if self.domains.iter().any(|d| lowered.contains(d.as_str())) {
            return Some(DENYLIST_CONFIDENCE);
        }
        let host = url_host(url);
        if !host.is_empty() && HOST_PATTERNS.iter().any(|p| p.is_match(&host)) {
            return Some(PATTERN_CONFIDENCE);
        }
        None
    }

    fn matched_keywords(&self, text: &str) -> Vec<String> {
        let plain = normalize_text(text);
        let leet = normalize_leetspeak(text);

        self.keywords
            .iter()
            .filter(|k| plain.contains(k.as_str()) || leet.contains(k.as_str()))
            .cloned()
            .collect()
    }

    fn bare_domains(&self, text: &str) -> Vec<String> {
        let plain = normalize_text(text);
        let leet = normalize_leetspeak(text);

        self.domains
            .iter()
            .filter(|d| plain.contains(d.as_str()) || leet.contains(d.as_str()))
            .cloned()
            .collect()
    }

    pub fn scan_text(&self, text: &str) -> ModerationVerdict {
        let mut keywords = self.matched_keywords(text);
        let keyword_confidence =
            (keywords.len() as f32 / KEYWORDS_FOR_CAP).min(KEYWORD_CONFIDENCE_CAP);

        let mut urls = Vec::new();
        let mut url_confidence: Option<f32> = None;
        for url in extract_urls(text) {
            if let Some(confidence) = self.match_url(&url) {
                url_confidence = Some(url_confidence.map_or(confidence, |c| c.max(confidence)));
                if !urls.contains(&url) {
                    urls.push(url);
                }
            }
        }

        // A denylisted domain written out without a scheme still counts as a link.
        if url_confidence.is_none() {
            let domains = self.bare_domains(text);
            if !domains.is_empty() {
                url_confidence = Some(DENYLIST_CONFIDENCE);
                for domain in domains {
                    if !keywords.contains(&domain) {
                        keywords.push(domain);
                    }
                }
            }
        }

        match url_confidence {
            Some(confidence) => ModerationVerdict {
                is_nsfw: true,
                confidence: confidence.max(keyword_confidence),
                severity: Severity::Explicit,
                keywords,
                urls,
            },
            None => ModerationVerdict {
                is_nsfw: !keywords.is_empty(),
                confidence: keyword_confidence,
                severity: Severity::from_confidence(keyword_confidence),
                keywords,
                urls,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_beta_is_safe() {
        let verdict = NsfwScanner::new()
            .scan_text("Sent the v5 at the cave today, heel hook on the second move is key!");
        assert!(!verdict.is_nsfw);
        assert_eq!(verdict.confidence, 0.0);
        assert_eq!(verdict.severity, Severity::Safe);
        assert!(verdict.keywords.is_empty());
    }

    #[test]
    fn harmless_links_do_not_trip() {
        let verdict = NsfwScanner::new().scan_text("Topo here: https://www.thecrag.com/area/123");
        assert!(!verdict.is_nsfw);
        assert!(verdict.urls.is_empty());
    }

    #[test]
    fn keyword_confidence_scales_with_matches() {
        let scanner = NsfwScanner::new();
        let one = scanner.scan_text("nsfw");
        assert!((one.confidence - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(one.severity, Severity::Mild);

        let two = scanner.scan_text("nsfw and naked");
        assert_eq!(two.severity, Severity::Moderate);

        let many = scanner.scan_text("nsfw naked erotic fetish hentai");
        assert_eq!(many.confidence, KEYWORD_CONFIDENCE_CAP);
        assert_eq!(many.severity, Severity::Explicit);
    }

    #[test]
    fn leetspeak_matches_like_plain_text() {
        let scanner = NsfwScanner::new();
        let obfuscated = scanner.scan_text("n4k3d");
        let plain = scanner.scan_text("naked");
        assert_eq!(obfuscated.keywords, plain.keywords);
        assert_eq!(obfuscated.confidence, plain.confidence);
        assert_eq!(normalize_leetspeak("h3ll0"), "hello");
    }

    #[test]
    fn denylisted_url_is_explicit() {
        let verdict = NsfwScanner::new().scan_text("Check out https://pornhub.com/x");
        assert!(verdict.is_nsfw);
        assert!(verdict.confidence >= 0.85);
        assert_eq!(verdict.severity, Severity::Explicit);
        assert_eq!(verdict.urls, vec!["https://pornhub.com/x".to_string()]);
    }

    #[test]
    fn bare_denylisted_domain_is_explicit() {
        let verdict = NsfwScanner::new().scan_text("find me on pornhub");
        assert!(verdict.is_nsfw);
        assert!(verdict.confidence >= 0.85);
        assert!(verdict.keywords.contains(&"pornhub".to_string()));
    }

    #[test]
    fn pattern_urls_get_pattern_confidence() {
        let scanner = NsfwScanner::new();
        assert_eq!(
            scanner.match_url("https://hotsexcams.example.xxx/live"),
            Some(PATTERN_CONFIDENCE)
        );
        assert_eq!(
            scanner.match_url("http://adultfriends.net"),
            Some(PATTERN_CONFIDENCE)
        );
        assert_eq!(scanner.match_url("https://sussexclimbing.co.uk"), None);
    }

    #[test]
    fn patterns_look_at_the_host_not_the_path() {
        let scanner = NsfwScanner::new();
        assert_eq!(scanner.match_url("https://gym.com/adult-classes.html"), None);
        assert_eq!(scanner.match_url("https://gym.com/events?tag=sex-ed.info"), None);
        assert_eq!(
            scanner.match_url("https://adultfriends.net"),
            Some(PATTERN_CONFIDENCE)
        );
        assert_eq!(
            scanner.match_url("www.nsfwclips.co.uk/a"),
            Some(PATTERN_CONFIDENCE)
        );

        let verdict = scanner
            .scan_text("Our gym now runs https://boulderbarn.com/adult-classes.html every Tuesday");
        assert!(!verdict.is_nsfw);
        assert!(verdict.urls.is_empty());
        assert_eq!(verdict.severity, Severity::Safe);
    }

    #[test]
    fn host_is_stripped_of_scheme_port_and_path() {
        assert_eq!(url_host("HTTPS://www.Example.com:8443/a?b#c"), "example.com");
        assert_eq!(url_host("www.thecrag.com/area/1"), "thecrag.com");
        assert_eq!(url_host("http://user:pw@cdn.site.org/x"), "cdn.site.org");
    }

    #[test]
    fn trailing_punctuation_is_not_part_of_the_url() {
        assert_eq!(
            extract_urls("see www.example.com/topo."),
            vec!["www.example.com/topo".to_string()]
        );
    }

    #[test]
    fn extra_keywords_are_normalized() {
        let scanner = NsfwScanner::new().with_extra_keywords(["Spicy-Beta"]);
        let verdict = scanner.scan_text("some spicy beta for you");
        assert!(verdict.is_nsfw);
        assert_eq!(verdict.keywords, vec!["spicy beta".to_string()]);
    }
}
