use chrono::Utc;
use std::{sync::Arc, time::Duration};

use crate::domain::{rate_limit::repository::RateLimitStore, shared::errors::DomainError};

/// Deletes rate-limit windows that expired and were never hit again.
pub struct RateLimitCleanupWorker {
    store: Arc<dyn RateLimitStore>,
    interval_seconds: u64,
}

impl RateLimitCleanupWorker {
    pub fn new(store: Arc<dyn RateLimitStore>, interval_seconds: u64) -> Self {
        Self {
            store,
            interval_seconds: interval_seconds.max(10),
        }
    }

    pub async fn run_once(&self) -> Result<u64, DomainError> {
        self.store.purge_expired(Utc::now()).await
    }

    pub async fn start(&self) {
        loop {
            match self.run_once().await {
                Ok(0) => {}
                Ok(purged) => tracing::debug!(purged, "expired rate limit windows removed"),
                Err(e) => tracing::warn!(error = %e, "rate limit cleanup failed"),
            }

            tokio::time::sleep(Duration::from_secs(self.interval_seconds)).await;
        }
    }
}
