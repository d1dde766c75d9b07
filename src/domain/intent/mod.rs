use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use ts_rs::TS;

use crate::domain::shared::errors::DomainError;

/// A user-declared interest captured at onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum UserIntent {
    FindPartners,
    DiscoverGyms,
    JoinCommunities,
    LearnTechniques,
    ShareProgress,
    FindEvents,
}

impl UserIntent {
    pub const ALL: [UserIntent; 6] = [
        UserIntent::FindPartners,
        UserIntent::DiscoverGyms,
        UserIntent::JoinCommunities,
        UserIntent::LearnTechniques,
        UserIntent::ShareProgress,
        UserIntent::FindEvents,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserIntent::FindPartners => "find_partners",
            UserIntent::DiscoverGyms => "discover_gyms",
            UserIntent::JoinCommunities => "join_communities",
            UserIntent::LearnTechniques => "learn_techniques",
            UserIntent::ShareProgress => "share_progress",
            UserIntent::FindEvents => "find_events",
        }
    }
}

impl fmt::Display for UserIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserIntent {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        UserIntent::ALL
            .into_iter()
            .find(|intent| intent.as_str() == tag)
            .ok_or_else(|| DomainError::ValidationError(format!("Unknown intent tag: {}", s)))
    }
}

/// Parses stored tags, silently dropping ones this build does not know.
///
/// Profiles can outlive the enum, so reads are lenient while writes go
/// through [`parse_intents`].
pub fn parse_stored_intents<S: AsRef<str>>(tags: &[S]) -> Vec<UserIntent> {
    let mut intents: Vec<UserIntent> = tags
        .iter()
        .filter_map(|t| t.as_ref().parse().ok())
        .collect();
    intents.sort();
    intents.dedup();
    intents
}

/// Strict parse for onboarding input. Duplicates collapse, unknown tags fail.
pub fn parse_intents<S: AsRef<str>>(tags: &[S]) -> Result<Vec<UserIntent>, DomainError> {
    let mut intents = tags
        .iter()
        .map(|t| t.as_ref().parse::<UserIntent>())
        .collect::<Result<Vec<_>, _>>()?;
    intents.sort();
    intents.dedup();
    Ok(intents)
}
