//! # AuthGate Core
//!
//! Core business logic and domain layer for the AuthGate backend.
//! This crate contains the token lifecycle engine (signing, revocation,
//! refresh-token rotation), domain entities, repository interfaces,
//! and error types that form the foundation of the application.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::token::{Claims, RefreshToken, TokenPair};
pub use domain::entities::user::{User, DEFAULT_ROLE, PASSWORD_FACTOR_AUTHORITY};
pub use errors::{AuthError, DomainError, DomainResult, TokenError};
pub use repositories::{TokenRepository, UserRepository};
pub use services::{
    AuthService, AuthServiceConfig, CleanupResult, IssuedRefreshToken, PasswordHasher,
    RevocationRegistry, SessionManager, TokenCleanupConfig, TokenCleanupService, TokenSigner,
    TokenSignerConfig,
};
