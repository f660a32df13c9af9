//! Periodic maintenance of refresh tokens and the revocation registry
//!
//! Neither store strictly needs cleanup for correctness — expired refresh
//! tokens are rejected on rotation and revoked identifiers are rejected
//! before the registry is even consulted — but both grow without bound
//! unless something prunes them.

use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::errors::DomainError;
use crate::repositories::TokenRepository;

use super::revocation::RevocationRegistry;

/// Configuration for the token cleanup service
#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600, // Run every hour
            enabled: true,
        }
    }
}

/// Service for cleaning up expired refresh tokens and revocation entries
pub struct TokenCleanupService<R: TokenRepository + 'static> {
    repository: Arc<R>,
    registry: Arc<RevocationRegistry>,
    config: TokenCleanupConfig,
}

impl<R: TokenRepository> TokenCleanupService<R> {
    /// Create a new token cleanup service
    pub fn new(
        repository: Arc<R>,
        registry: Arc<RevocationRegistry>,
        config: TokenCleanupConfig,
    ) -> Self {
        Self {
            repository,
            registry,
            config,
        }
    }

    /// Run a single cleanup cycle
    ///
    /// Deletes expired refresh-token rows and prunes revocation entries
    /// whose expiry has passed. A persistence failure is recorded in the
    /// result rather than aborting the cycle.
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        let mut result = CleanupResult::default();

        match self.repository.delete_expired_tokens().await {
            Ok(count) => {
                result.expired_tokens_deleted = count;
            }
            Err(e) => {
                error!("Failed to delete expired refresh tokens: {}", e);
                result.errors.push(format!("Token cleanup error: {}", e));
            }
        }

        result.revocations_pruned = self.registry.prune(Utc::now());

        info!(
            expired_tokens = result.expired_tokens_deleted,
            revocations = result.revocations_pruned,
            "Token cleanup cycle completed"
        );

        Ok(result)
    }

    /// Start the cleanup service as a background task
    ///
    /// Spawns a tokio task that runs cleanup at the configured interval.
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            warn!("Token cleanup service is disabled");
            return;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        tokio::spawn(async move {
            info!(
                "Token cleanup service started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so startup isn't
            // spent on a cleanup of an empty store.
            interval_timer.tick().await;

            loop {
                interval_timer.tick().await;

                match self.run_cleanup().await {
                    Ok(result) => {
                        if !result.errors.is_empty() {
                            warn!("Cleanup completed with errors: {:?}", result.errors);
                        }
                    }
                    Err(e) => {
                        error!("Token cleanup cycle failed: {}", e);
                    }
                }
            }
        });
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Number of expired refresh tokens deleted
    pub expired_tokens_deleted: usize,
    /// Number of revocation entries pruned
    pub revocations_pruned: usize,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    /// Check if the cleanup was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get total number of items cleaned up
    pub fn total_cleaned(&self) -> usize {
        self.expired_tokens_deleted + self.revocations_pruned
    }
}
