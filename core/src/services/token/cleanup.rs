//! Periodic purge of expired and consumed refresh records

use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

use tp_shared::CleanupConfig;

use crate::errors::DomainError;
use crate::repositories::TokenRepository;

/// Service for removing refresh records that can no longer be redeemed
pub struct TokenCleanupService<R: TokenRepository + ?Sized + 'static> {
    repository: Arc<R>,
    config: CleanupConfig,
}

impl<R: TokenRepository + ?Sized + 'static> TokenCleanupService<R> {
    /// Create a new token cleanup service
    pub fn new(repository: Arc<R>, config: CleanupConfig) -> Self {
        Self { repository, config }
    }

    /// Run a single cleanup cycle
    ///
    /// # Returns
    /// * `Ok(CleanupResult)` - Summary of the cycle; store errors are
    ///   collected into `errors` rather than returned
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        let mut result = CleanupResult::default();

        match self.repository.delete_expired_tokens(Utc::now()).await {
            Ok(count) => {
                result.expired_tokens_deleted = count;
                if count > 0 {
                    info!(deleted = count, "Deleted expired refresh records");
                }
            }
            Err(e) => {
                error!("Failed to cleanup expired tokens: {}", e);
                result.errors.push(format!("Token cleanup error: {}", e));
            }
        }

        Ok(result)
    }

    /// Start the cleanup service as a background task
    ///
    /// Returns `None` when cleanup is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<tokio::task::JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Token cleanup service is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds.max(1));

        Some(tokio::spawn(async move {
            info!(
                "Token cleanup service started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                match self.run_cleanup().await {
                    Ok(result) => {
                        if !result.is_success() {
                            warn!("Cleanup completed with errors: {:?}", result.errors);
                        }
                    }
                    Err(e) => {
                        error!("Token cleanup cycle failed: {}", e);
                    }
                }
            }
        }))
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Number of refresh records deleted
    pub expired_tokens_deleted: usize,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    /// Check if the cleanup was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
