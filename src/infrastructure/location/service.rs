use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::geo::{Coordinates, Position};

/// Accuracy radius beyond which a high-accuracy request rejects a fix.
pub const HIGH_ACCURACY_MAX_M: f64 = 100.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("position unavailable: {0}")]
    Unavailable(String),
    #[error("position request timed out")]
    Timeout,
}

/// What the client last told us about its position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportedPosition {
    Granted(Position),
    Denied {
        reported_at: chrono::DateTime<Utc>,
    },
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn latest(&self, user_id: Uuid) -> Result<Option<ReportedPosition>, LocationError>;
    async fn report(
        &self,
        user_id: Uuid,
        reported: ReportedPosition,
        ttl: Duration,
    ) -> Result<(), LocationError>;
}

#[derive(Debug, Clone, Copy)]
pub struct LocationOptions {
    pub timeout: Duration,
    /// Positions older than this are treated as unavailable.
    pub maximum_age: Duration,
    pub enable_high_accuracy: bool,
}

impl Default for LocationOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(5 * 60),
            enable_high_accuracy: false,
        }
    }
}

pub struct LocationService {
    source: Arc<dyn PositionSource>,
    options: LocationOptions,
}

impl LocationService {
    pub fn new(source: Arc<dyn PositionSource>, options: LocationOptions) -> Self {
        Self { source, options }
    }

    pub fn options(&self) -> &LocationOptions {
        &self.options
    }

    /// The user's current position, bounded by the configured timeout.
    ///
    /// There is no retry; a timeout surfaces as [`LocationError::Timeout`].
    pub async fn current_position(&self, user_id: Uuid) -> Result<Position, LocationError> {
        let latest = tokio::time::timeout(self.options.timeout, self.source.latest(user_id))
            .await
            .map_err(|_| LocationError::Timeout)??;

        let position = match latest {
            None => return Err(LocationError::Unavailable("no recent position".into())),
            Some(ReportedPosition::Denied { .. }) => return Err(LocationError::PermissionDenied),
            Some(ReportedPosition::Granted(position)) => position,
        };

        let age = Utc::now().signed_duration_since(position.captured_at);
        let max_age = chrono::Duration::from_std(self.options.maximum_age)
            .unwrap_or_else(|_| chrono::Duration::minutes(5));
        if age > max_age {
            return Err(LocationError::Unavailable("position is stale".into()));
        }

        if self.options.enable_high_accuracy
            && position
                .accuracy_m
                .is_none_or(|accuracy| accuracy > HIGH_ACCURACY_MAX_M)
        {
            return Err(LocationError::Unavailable(
                "position is not accurate enough".into(),
            ));
        }

        Ok(position)
    }

    /// Stores a client report for the length of the cache window.
    pub async fn report(&self, user_id: Uuid, reported: ReportedPosition) -> Result<(), LocationError> {
        if let ReportedPosition::Granted(position) = &reported {
            if !position.coordinates.is_valid() {
                return Err(LocationError::Unavailable("coordinates out of range".into()));
            }
        }
        self.source
            .report(user_id, reported, self.options.maximum_age)
            .await
    }

    /// Explicit coordinates win; otherwise the cached position, if any.
    ///
    /// Every location failure degrades to `None`.
    pub async fn resolve(&self, user_id: Uuid, explicit: Option<Coordinates>) -> Option<Coordinates> {
        if let Some(coordinates) = explicit {
            return Some(coordinates);
        }
        match self.current_position(user_id).await {
            Ok(position) => Some(position.coordinates),
            Err(e) => {
                tracing::debug!(%user_id, error = %e, "continuing without location");
                None
            }
        }
    }
}
