use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};

use super::nsfw_scanner::NsfwScanner;

/// Confidence the URL heuristic assigns to a flagged image.
pub const HEURISTIC_IMAGE_CONFIDENCE: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageVerdict {
    pub is_nsfw: bool,
    pub confidence: f32,
}

impl ImageVerdict {
    pub fn clean() -> Self {
        Self {
            is_nsfw: false,
            confidence: 0.0,
        }
    }
}

/// Decides whether an image is explicit.
///
/// Implementations may call out to a remote vision model; errors are handed
/// back to the caller, which applies its own failure policy.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    async fn classify(&self, image_url: &str) -> anyhow::Result<ImageVerdict>;
}

/// Looks only at the URL string. Never inspects pixels.
pub struct UrlHeuristicClassifier {
    scanner: Arc<NsfwScanner>,
}

impl UrlHeuristicClassifier {
    pub fn new(scanner: Arc<NsfwScanner>) -> Self {
        Self { scanner }
    }
}

/// Verdict for a URL that hits the denylist or host patterns.
fn screen_url(scanner: &NsfwScanner, image_url: &str) -> Option<ImageVerdict> {
    scanner.match_url(image_url).map(|_| ImageVerdict {
        is_nsfw: true,
        confidence: HEURISTIC_IMAGE_CONFIDENCE,
    })
}

#[async_trait]
impl ImageClassifier for UrlHeuristicClassifier {
    async fn classify(&self, image_url: &str) -> anyhow::Result<ImageVerdict> {
        Ok(screen_url(&self.scanner, image_url).unwrap_or_else(ImageVerdict::clean))
    }
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct ClassifyResponse {
    nsfw: bool,
    confidence: f32,
}

/// Posts image URLs to an external vision endpoint.
///
/// URLs on the denylist are flagged locally and never sent. The endpoint
/// receives `{"url": "..."}` and answers `{"nsfw": bool, "confidence": 0..1}`.
pub struct HttpImageClassifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    scanner: Arc<NsfwScanner>,
}

impl HttpImageClassifier {
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        timeout: Duration,
        scanner: Arc<NsfwScanner>,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
            scanner,
        })
    }
}

#[async_trait]
impl ImageClassifier for HttpImageClassifier {
    async fn classify(&self, image_url: &str) -> anyhow::Result<ImageVerdict> {
        if let Some(verdict) = screen_url(&self.scanner, image_url) {
            tracing::debug!(image_url, "image url denylisted, endpoint skipped");
            return Ok(verdict);
        }

        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&ClassifyRequest { url: image_url });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?.error_for_status()?;
        let body: ClassifyResponse = response.json().await?;

        tracing::debug!(
            image_url,
            nsfw = body.nsfw,
            confidence = body.confidence,
            "image classified"
        );
        Ok(ImageVerdict {
            is_nsfw: body.nsfw,
            confidence: body.confidence.clamp(0.0, 1.0),
        })
    }
}
