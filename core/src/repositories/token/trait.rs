//! Token repository trait defining the interface for refresh token persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

/// Repository trait for RefreshToken persistence operations
///
/// Tokens are addressed by the SHA-256 digest of their opaque value; raw
/// values never reach the store. Every operation is atomic with respect
/// to the rows it touches — `replace_user_token` and `take_refresh_token`
/// are the two seams the session layer relies on for its consistency
/// guarantees:
///
/// - `replace_user_token` must not let two concurrent calls for the same
///   user leave two live rows (last writer wins).
/// - `take_refresh_token` must hand a given row to at most one caller,
///   so two concurrent rotations of the same value cannot both succeed.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Atomically delete every refresh token owned by `token.user_id`
    /// and insert `token` in its place
    ///
    /// This is the only insertion path, which is what keeps the
    /// at-most-one-live-token-per-user invariant a structural property
    /// of the store rather than a convention.
    ///
    /// # Returns
    /// * `Ok(RefreshToken)` - The saved token
    /// * `Err(DomainError)` - Save failed
    async fn replace_user_token(&self, token: RefreshToken) -> Result<RefreshToken, DomainError>;

    /// Find a refresh token by its hashed value
    ///
    /// # Returns
    /// * `Ok(Some(RefreshToken))` - Token found
    /// * `Ok(None)` - No token with the given digest
    /// * `Err(DomainError)` - Database error occurred
    async fn find_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, DomainError>;

    /// Atomically find AND delete a refresh token by its hashed value
    ///
    /// At most one caller observes the row; everyone else gets `None`.
    /// Rotation is built on this: once a value has been taken it can
    /// never be exchanged again.
    ///
    /// # Example
    /// ```no_run
    /// # use ag_core::repositories::TokenRepository;
    /// # async fn example(repo: &impl TokenRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// match repo.take_refresh_token("sha256_digest").await? {
    ///     Some(token) => println!("consumed token for user {}", token.user_id),
    ///     None => println!("not found or already used"),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    async fn take_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, DomainError>;

    /// Find all refresh tokens for a user
    async fn find_user_tokens(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError>;

    /// Delete all refresh tokens for a user
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of tokens deleted
    async fn delete_user_tokens(&self, user_id: Uuid) -> Result<usize, DomainError>;

    /// Delete expired refresh tokens from the repository
    ///
    /// Called periodically by the cleanup task.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of expired tokens deleted
    async fn delete_expired_tokens(&self) -> Result<usize, DomainError>;

    /// Count refresh tokens held by a user
    async fn count_user_tokens(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let tokens = self.find_user_tokens(user_id).await?;
        Ok(tokens.len())
    }
}
