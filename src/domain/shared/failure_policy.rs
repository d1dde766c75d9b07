use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;

/// What a check does when its backing infrastructure fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FailurePolicy {
    /// Let the action through.
    Open,
    /// Treat the failure as a failed check.
    Closed,
}

impl FailurePolicy {
    pub fn allows_on_failure(&self) -> bool {
        matches!(self, FailurePolicy::Open)
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(FailurePolicy::Open),
            "closed" => Ok(FailurePolicy::Closed),
            other => Err(format!("expected `open` or `closed`, got `{}`", other)),
        }
    }
}
