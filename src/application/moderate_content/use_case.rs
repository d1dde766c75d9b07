use super::dto::ScanRequest;
use crate::{
    domain::{
        moderation::{
            repository::{ContentKind, ModerationLogEntry, ModerationLogRepository},
            verdict::{ModerationAction, ModerationVerdict, Severity},
        },
        shared::failure_policy::FailurePolicy,
    },
    infrastructure::security::{
        image_classifier::{ImageClassifier, ImageVerdict},
        nsfw_scanner::{DENYLIST_CONFIDENCE, NsfwScanner},
    },
};
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

const EXCERPT_CHARS: usize = 200;

/// When a verdict stops a submission outright.
#[derive(Debug, Clone, Copy)]
pub struct ModerationPolicy {
    pub block_above: f32,
}

impl Default for ModerationPolicy {
    fn default() -> Self {
        Self { block_above: 0.5 }
    }
}

impl ModerationPolicy {
    /// Blocks on high confidence or on any flagged link.
    pub fn should_block(&self, verdict: &ModerationVerdict) -> bool {
        verdict.confidence > self.block_above || !verdict.urls.is_empty()
    }

    pub fn decide(&self, verdict: &ModerationVerdict) -> ModerationAction {
        if self.should_block(verdict) {
            ModerationAction::Blocked
        } else if verdict.is_nsfw {
            ModerationAction::Flagged
        } else {
            ModerationAction::Allowed
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModerationOutcome {
    pub verdict: ModerationVerdict,
    pub action: ModerationAction,
}

impl ModerationOutcome {
    pub fn is_blocked(&self) -> bool {
        self.action == ModerationAction::Blocked
    }
}

pub struct ModerateContentUseCase {
    scanner: Arc<NsfwScanner>,
    classifier: Arc<dyn ImageClassifier>,
    logs: Arc<dyn ModerationLogRepository>,
    policy: ModerationPolicy,
    on_classifier_failure: FailurePolicy,
}

impl ModerateContentUseCase {
    pub fn new(
        scanner: Arc<NsfwScanner>,
        classifier: Arc<dyn ImageClassifier>,
        logs: Arc<dyn ModerationLogRepository>,
        policy: ModerationPolicy,
        on_classifier_failure: FailurePolicy,
    ) -> Self {
        Self {
            scanner,
            classifier,
            logs,
            policy,
            on_classifier_failure,
        }
    }

    pub fn policy(&self) -> &ModerationPolicy {
        &self.policy
    }

    /// Text verdict merged with one verdict per image.
    ///
    /// Images are classified concurrently. A classifier error is resolved by
    /// the configured failure policy instead of being returned.
    #[instrument(skip_all, fields(text_len = request.text.len(), images = request.image_urls().len()))]
    pub async fn scan(&self, request: &ScanRequest) -> ModerationVerdict {
        let text_verdict = self.scanner.scan_text(&request.text);

        let images = request.image_urls();
        let classified = join_all(images.iter().map(|url| self.classifier.classify(url))).await;

        let verdict = images
            .iter()
            .zip(classified)
            .fold(text_verdict, |verdict, (url, result)| {
                let image = match result {
                    Ok(image) => image,
                    Err(e) => self.classifier_failure(url, &e),
                };
                if image.is_nsfw {
                    verdict.merge(image_verdict(url, image))
                } else {
                    verdict
                }
            });

        debug!(
            is_nsfw = verdict.is_nsfw,
            confidence = verdict.confidence,
            severity = verdict.severity.as_str(),
            "content scanned"
        );
        verdict
    }

    /// Scans a submission, decides what to do with it and records an audit
    /// row for anything that is not plainly allowed.
    pub async fn review(
        &self,
        user_id: Uuid,
        kind: ContentKind,
        request: &ScanRequest,
    ) -> ModerationOutcome {
        let verdict = self.scan(request).await;
        let action = self.policy.decide(&verdict);

        if action != ModerationAction::Allowed {
            let entry = ModerationLogEntry {
                user_id,
                content_kind: kind,
                content_excerpt: request.text.chars().take(EXCERPT_CHARS).collect(),
                verdict: verdict.clone(),
                action,
            };
            if let Err(e) = self.logs.record(entry).await {
                warn!(%user_id, kind = kind.as_str(), error = %e, "moderation log write failed");
            }
        }

        ModerationOutcome { verdict, action }
    }

    fn classifier_failure(&self, url: &str, error: &anyhow::Error) -> ImageVerdict {
        warn!(
            image_url = url,
            error = %error,
            policy = ?self.on_classifier_failure,
            "image classifier failed"
        );
        if self.on_classifier_failure.allows_on_failure() {
            ImageVerdict::clean()
        } else {
            ImageVerdict {
                is_nsfw: true,
                confidence: DENYLIST_CONFIDENCE,
            }
        }
    }
}

fn image_verdict(url: &str, image: ImageVerdict) -> ModerationVerdict {
    ModerationVerdict {
        is_nsfw: true,
        confidence: image.confidence,
        severity: Severity::from_confidence(image.confidence),
        keywords: Vec::new(),
        urls: vec![url.to_string()],
    }
}
