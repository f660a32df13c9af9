//! User repository trait defining the interface for the user directory.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User persistence operations
///
/// This is the boundary to the user directory: credential lookup by
/// identity, existence checks for registration, and account creation.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their email identity
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with the given email
    /// * `Err(DomainError)` - Database error occurred
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by their unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Check whether a user with the given email exists
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError>;

    /// Create a new user record
    ///
    /// # Returns
    /// * `Ok(User)` - The created user
    /// * `Err(DomainError)` - Creation failed (e.g. duplicate email)
    async fn create(&self, user: User) -> Result<User, DomainError>;
}
