//! Tests for the authentication service orchestration

use chrono::Duration;
use std::sync::Arc;

use crate::domain::entities::user::DEFAULT_ROLE;
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::token::MockTokenRepository;
use crate::repositories::user::MockUserRepository;
use crate::repositories::{TokenRepository, UserRepository};
use crate::services::auth::{AuthService, AuthServiceConfig};
use crate::services::session::SessionManager;
use crate::services::token::{RevocationRegistry, TokenSigner, TokenSignerConfig};

use super::mocks::MockPasswordHasher;

struct TestHarness {
    service: AuthService<MockUserRepository, MockTokenRepository, MockPasswordHasher>,
    users: Arc<MockUserRepository>,
    tokens: Arc<MockTokenRepository>,
    signer: Arc<TokenSigner>,
    registry: Arc<RevocationRegistry>,
}

fn harness() -> TestHarness {
    harness_with_config(AuthServiceConfig::default())
}

fn harness_with_config(config: AuthServiceConfig) -> TestHarness {
    let users = Arc::new(MockUserRepository::new());
    let tokens = Arc::new(MockTokenRepository::new());
    let signer = Arc::new(TokenSigner::new(TokenSignerConfig {
        secret: "test-secret-key-for-signing".to_string(),
        issuer: "authgate".to_string(),
    }));
    let registry = Arc::new(RevocationRegistry::new());
    let sessions = Arc::new(SessionManager::new(Arc::clone(&tokens), Duration::days(7)));

    let service = AuthService::new(
        Arc::clone(&users),
        sessions,
        Arc::clone(&signer),
        Arc::clone(&registry),
        Arc::new(MockPasswordHasher),
        config,
    );

    TestHarness {
        service,
        users,
        tokens,
        signer,
        registry,
    }
}

#[tokio::test]
async fn test_register_issues_token_pair() {
    let h = harness();

    let pair = h.service.register("a@x.com", "hunter2hunter2").await.unwrap();

    let claims = h.signer.verify(&pair.access_token).unwrap();
    assert_eq!(claims.sub, "a@x.com");
    assert!(claims.authorities.contains(DEFAULT_ROLE));

    let user = h.users.find_by_email("a@x.com").await.unwrap().unwrap();
    assert_eq!(user.password_hash, "hashed:hunter2hunter2");
    assert_eq!(h.tokens.count_user_tokens(user.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let h = harness();

    h.service.register("a@x.com", "first-password").await.unwrap();
    let err = h
        .service
        .register("a@x.com", "second-password")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DomainError::Auth(AuthError::UserAlreadyExists)
    ));
}

#[tokio::test]
async fn test_register_can_be_disabled() {
    let h = harness_with_config(AuthServiceConfig {
        allow_registration: false,
        ..Default::default()
    });

    let err = h.service.register("a@x.com", "password").await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::RegistrationDisabled)
    ));
}

#[tokio::test]
async fn test_login_with_valid_credentials() {
    let h = harness();
    h.service.register("a@x.com", "correct-password").await.unwrap();

    let pair = h.service.login("a@x.com", "correct-password").await.unwrap();
    let claims = h.signer.verify(&pair.access_token).unwrap();
    assert_eq!(claims.sub, "a@x.com");
}

#[tokio::test]
async fn test_login_failures() {
    let h = harness();
    h.service.register("a@x.com", "correct-password").await.unwrap();

    let err = h.service.login("a@x.com", "wrong-password").await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::AuthenticationFailed)
    ));

    let err = h.service.login("nobody@x.com", "whatever").await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::UserNotFound)));
}

#[tokio::test]
async fn test_login_supersedes_previous_session() {
    let h = harness();
    let first = h.service.register("a@x.com", "password-123").await.unwrap();
    let second = h.service.login("a@x.com", "password-123").await.unwrap();

    assert_ne!(first.refresh_token, second.refresh_token);

    // The register-time refresh token was replaced by the login
    let err = h.service.refresh(&first.refresh_token).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token(TokenError::InvalidRefreshToken)
    ));
}

#[tokio::test]
async fn test_logout_revokes_access_and_refresh() {
    let h = harness();
    let pair = h.service.register("a@x.com", "password-123").await.unwrap();
    let claims = h.signer.verify(&pair.access_token).unwrap();
    let user = h.users.find_by_email("a@x.com").await.unwrap().unwrap();

    assert!(!h.registry.is_revoked(&claims.jti));

    h.service
        .logout(&format!("Bearer {}", pair.access_token))
        .await
        .unwrap();

    assert!(h.registry.is_revoked(&claims.jti));
    assert_eq!(h.tokens.count_user_tokens(user.id).await.unwrap(), 0);

    // The refresh token issued alongside is gone too
    let err = h.service.refresh(&pair.refresh_token).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token(TokenError::InvalidRefreshToken)
    ));
}

#[tokio::test]
async fn test_verify_access_token_checks_revocation() {
    let h = harness();
    let pair = h.service.register("a@x.com", "password-123").await.unwrap();

    let claims = h
        .service
        .verify_access_token(&format!("Bearer {}", pair.access_token))
        .unwrap();
    assert_eq!(claims.sub, "a@x.com");

    h.service
        .logout(&format!("Bearer {}", pair.access_token))
        .await
        .unwrap();

    // The token still verifies cryptographically, but its identifier is
    // now revoked
    let err = h
        .service
        .verify_access_token(&pair.access_token)
        .unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::TokenRevoked)));

    let err = h.service.verify_access_token("garbage").unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::MalformedToken)));
}

#[tokio::test]
async fn test_logout_with_garbage_token_is_a_silent_no_op() {
    let h = harness();
    h.service.register("a@x.com", "password-123").await.unwrap();
    let user = h.users.find_by_email("a@x.com").await.unwrap().unwrap();

    h.service.logout("Bearer not-a-real-token").await.unwrap();
    h.service.logout("").await.unwrap();

    assert!(h.registry.is_empty());
    assert_eq!(h.tokens.count_user_tokens(user.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_logout_accepts_bare_token_without_prefix() {
    let h = harness();
    let pair = h.service.register("a@x.com", "password-123").await.unwrap();
    let claims = h.signer.verify(&pair.access_token).unwrap();

    h.service.logout(&pair.access_token).await.unwrap();

    assert!(h.registry.is_revoked(&claims.jti));
}

#[tokio::test]
async fn test_refresh_rotates_the_pair() {
    let h = harness();
    let pair = h.service.register("a@x.com", "password-123").await.unwrap();

    let rotated = h.service.refresh(&pair.refresh_token).await.unwrap();
    assert_ne!(rotated.refresh_token, pair.refresh_token);

    let claims = h.signer.verify(&rotated.access_token).unwrap();
    assert_eq!(claims.sub, "a@x.com");

    // Re-presenting the original value fails: single use
    let err = h.service.refresh(&pair.refresh_token).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token(TokenError::InvalidRefreshToken)
    ));
}

#[tokio::test]
async fn test_refresh_with_unknown_value_fails() {
    let h = harness();

    let err = h.service.refresh("never-issued-value").await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token(TokenError::InvalidRefreshToken)
    ));
}

#[tokio::test]
async fn test_refresh_for_deleted_user_fails_and_leaves_no_session() {
    let h = harness();
    let pair = h.service.register("a@x.com", "password-123").await.unwrap();
    let user = h.users.find_by_email("a@x.com").await.unwrap().unwrap();

    assert!(h.users.remove(user.id).await);

    let err = h.service.refresh(&pair.refresh_token).await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::UserNotFound)));
    assert_eq!(h.tokens.count_user_tokens(user.id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_revoking_access_token_leaves_refresh_token_usable() {
    // The two tokens of a pair are independent after issuance; only the
    // combined logout path closes both.
    let h = harness();
    let pair = h.service.register("a@x.com", "password-123").await.unwrap();
    let claims = h.signer.verify(&pair.access_token).unwrap();

    h.registry.revoke(&claims.jti, claims.expires_at());

    let rotated = h.service.refresh(&pair.refresh_token).await;
    assert!(rotated.is_ok());
}
