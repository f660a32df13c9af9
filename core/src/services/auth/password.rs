//! Password hashing boundary

use async_trait::async_trait;

use crate::errors::DomainError;

/// Boundary to the password service
///
/// Plaintext passwords cross this seam exactly twice: once at
/// registration (hashed for storage) and once at login (verified against
/// the stored hash). The concrete implementation lives in the
/// infrastructure layer.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce a one-way hash of `plaintext` suitable for storage
    async fn hash(&self, plaintext: &str) -> Result<String, DomainError>;

    /// Check `plaintext` against a stored hash
    async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, DomainError>;
}
