//! Refresh-token session manager

use chrono::Duration;
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::{DomainResult, TokenError};
use crate::repositories::TokenRepository;

/// Length of the opaque refresh-token value handed to clients
const TOKEN_VALUE_LENGTH: usize = 32;

/// A freshly issued refresh token
///
/// `value` is the opaque string the client exchanges later; `token` is
/// the persisted record, which only carries the value's digest.
#[derive(Debug, Clone)]
pub struct IssuedRefreshToken {
    pub value: String,
    pub token: RefreshToken,
}

/// Manages the lifecycle of refresh tokens
///
/// Every user holds at most one live refresh token, and every token is
/// usable exactly once: rotation consumes the presented value before a
/// replacement is issued, so a replayed value always misses. The
/// legitimate holder of a stolen-and-used token finds out on their next
/// rotation attempt, which fails.
pub struct SessionManager<R: TokenRepository> {
    repository: Arc<R>,
    token_ttl: Duration,
}

impl<R: TokenRepository> SessionManager<R> {
    /// Creates a new session manager
    ///
    /// # Arguments
    ///
    /// * `repository` - Refresh token persistence
    /// * `token_ttl` - Lifetime of issued refresh tokens
    pub fn new(repository: Arc<R>, token_ttl: Duration) -> Self {
        Self {
            repository,
            token_ttl,
        }
    }

    /// Lifetime applied to issued refresh tokens
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Issues a new refresh token for `user_id`, superseding any existing one
    ///
    /// This is the only issuance path — login, registration, and rotation
    /// all end here. The delete-then-insert runs inside the store's
    /// `replace_user_token`, so concurrent calls for the same user cannot
    /// leave two live tokens.
    pub async fn create(&self, user_id: Uuid) -> DomainResult<IssuedRefreshToken> {
        let value = generate_token_value();
        let record = RefreshToken::new(user_id, hash_token_value(&value), self.token_ttl);

        let token = self.repository.replace_user_token(record).await?;
        debug!(user_id = %user_id, token_id = %token.id, "issued refresh token");

        Ok(IssuedRefreshToken { value, token })
    }

    /// Exchanges a presented refresh-token value for a fresh one
    ///
    /// The presented value is consumed atomically (`take_refresh_token`),
    /// which makes rotation linearizable per value: of two concurrent
    /// callers presenting the same value, exactly one takes the row and
    /// wins; the other misses and fails.
    ///
    /// # Errors
    ///
    /// * [`TokenError::InvalidRefreshToken`] - never existed, or already
    ///   consumed by a prior rotation
    /// * [`TokenError::RefreshTokenExpired`] - found but stale; the record
    ///   is deleted, so re-presenting the value fails with
    ///   `InvalidRefreshToken`
    pub async fn rotate(&self, presented_value: &str) -> DomainResult<IssuedRefreshToken> {
        let existing = self
            .repository
            .take_refresh_token(&hash_token_value(presented_value))
            .await?
            .ok_or(TokenError::InvalidRefreshToken)?;

        if existing.is_expired() {
            // Already consumed by the take above; nothing left to delete.
            warn!(user_id = %existing.user_id, "rejected expired refresh token");
            return Err(TokenError::RefreshTokenExpired.into());
        }

        self.create(existing.user_id).await
    }

    /// Deletes all refresh tokens for `user_id`, ending the session
    ///
    /// # Returns
    ///
    /// Number of tokens removed
    pub async fn invalidate(&self, user_id: Uuid) -> DomainResult<usize> {
        let removed = self.repository.delete_user_tokens(user_id).await?;
        debug!(user_id = %user_id, removed, "invalidated refresh tokens");
        Ok(removed)
    }
}

/// Digest of an opaque token value, as stored and looked up
pub fn hash_token_value(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn generate_token_value() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_VALUE_LENGTH)
        .map(char::from)
        .collect()
}
