use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Severity {
    Safe,
    Mild,
    Moderate,
    Explicit,
}

impl Severity {
    /// Maps a confidence score to a severity band.
    pub fn from_confidence(confidence: f32) -> Self {
        if confidence <= 0.0 {
            Severity::Safe
        } else if confidence < 0.4 {
            Severity::Mild
        } else if confidence < 0.7 {
            Severity::Moderate
        } else {
            Severity::Explicit
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Safe => "safe",
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Explicit => "explicit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ModerationVerdict {
    pub is_nsfw: bool,
    pub confidence: f32,
    pub severity: Severity,
    pub keywords: Vec<String>,
    pub urls: Vec<String>,
}

impl ModerationVerdict {
    pub fn safe() -> Self {
        Self {
            is_nsfw: false,
            confidence: 0.0,
            severity: Severity::Safe,
            keywords: vec![],
            urls: vec![],
        }
    }

    /// Folds another sub-verdict into this one: max confidence and severity, lists concatenated.
    pub fn merge(mut self, other: ModerationVerdict) -> Self {
        self.is_nsfw |= other.is_nsfw;
        self.confidence = self.confidence.max(other.confidence);
        self.severity = self.severity.max(other.severity);
        for keyword in other.keywords {
            if !self.keywords.contains(&keyword) {
                self.keywords.push(keyword);
            }
        }
        for url in other.urls {
            if !self.urls.contains(&url) {
                self.urls.push(url);
            }
        }
        self
    }
}

impl Default for ModerationVerdict {
    fn default() -> Self {
        Self::safe()
    }
}

/// What the caller decided to do with a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ModerationAction {
    Allowed,
    Flagged,
    Blocked,
}

impl ModerationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationAction::Allowed => "allowed",
            ModerationAction::Flagged => "flagged",
            ModerationAction::Blocked => "blocked",
        }
    }
}
