//! Tests for the session manager state machine

use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::{DomainError, TokenError};
use crate::repositories::token::MockTokenRepository;
use crate::repositories::TokenRepository;

use super::service::hash_token_value;
use super::SessionManager;

fn manager(repository: Arc<MockTokenRepository>) -> SessionManager<MockTokenRepository> {
    SessionManager::new(repository, Duration::days(7))
}

fn assert_invalid_refresh_token(err: DomainError) {
    assert!(
        matches!(err, DomainError::Token(TokenError::InvalidRefreshToken)),
        "expected InvalidRefreshToken, got {:?}",
        err
    );
}

#[tokio::test]
async fn test_create_enforces_single_session() {
    let repository = Arc::new(MockTokenRepository::new());
    let sessions = manager(Arc::clone(&repository));
    let user_id = Uuid::new_v4();

    let first = sessions.create(user_id).await.unwrap();
    let second = sessions.create(user_id).await.unwrap();

    assert_ne!(first.value, second.value);
    assert_eq!(repository.count_user_tokens(user_id).await.unwrap(), 1);

    // The superseded value can no longer be found
    assert!(repository
        .find_refresh_token(&hash_token_value(&first.value))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_create_stores_digest_not_value() {
    let repository = Arc::new(MockTokenRepository::new());
    let sessions = manager(Arc::clone(&repository));

    let issued = sessions.create(Uuid::new_v4()).await.unwrap();

    assert_ne!(issued.token.token_hash, issued.value);
    assert_eq!(issued.token.token_hash, hash_token_value(&issued.value));
}

#[tokio::test]
async fn test_rotate_is_single_use() {
    let repository = Arc::new(MockTokenRepository::new());
    let sessions = manager(Arc::clone(&repository));
    let user_id = Uuid::new_v4();

    let issued = sessions.create(user_id).await.unwrap();

    let rotated = sessions.rotate(&issued.value).await.unwrap();
    assert_ne!(rotated.value, issued.value);
    assert_eq!(rotated.token.user_id, user_id);

    // Re-presenting the consumed value always fails
    assert_invalid_refresh_token(sessions.rotate(&issued.value).await.unwrap_err());

    // And exactly one live token remains
    assert_eq!(repository.count_user_tokens(user_id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_rotate_unknown_value_fails() {
    let repository = Arc::new(MockTokenRepository::new());
    let sessions = manager(repository);

    assert_invalid_refresh_token(sessions.rotate("never-issued").await.unwrap_err());
}

#[tokio::test]
async fn test_rotate_expired_token_deletes_record() {
    let repository = Arc::new(MockTokenRepository::new());
    let sessions = manager(Arc::clone(&repository));
    let user_id = Uuid::new_v4();

    let issued = sessions.create(user_id).await.unwrap();

    // Backdate the stored record past its expiry
    let digest = hash_token_value(&issued.value);
    let mut stale = repository
        .take_refresh_token(&digest)
        .await
        .unwrap()
        .unwrap();
    stale.expires_at = Utc::now() - Duration::seconds(1);
    repository.replace_user_token(stale).await.unwrap();

    let err = sessions.rotate(&issued.value).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token(TokenError::RefreshTokenExpired)
    ));

    // The stale record was consumed; a retry fails as not-found
    assert_eq!(repository.count_user_tokens(user_id).await.unwrap(), 0);
    assert_invalid_refresh_token(sessions.rotate(&issued.value).await.unwrap_err());
}

#[tokio::test]
async fn test_invalidate_removes_all_user_tokens() {
    let repository = Arc::new(MockTokenRepository::new());
    let sessions = manager(Arc::clone(&repository));
    let user_id = Uuid::new_v4();

    sessions.create(user_id).await.unwrap();

    assert_eq!(sessions.invalidate(user_id).await.unwrap(), 1);
    assert_eq!(repository.count_user_tokens(user_id).await.unwrap(), 0);

    // Idempotent
    assert_eq!(sessions.invalidate(user_id).await.unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_rotation_has_exactly_one_winner() {
    let repository = Arc::new(MockTokenRepository::new());
    let sessions = Arc::new(manager(Arc::clone(&repository)));
    let user_id = Uuid::new_v4();

    let issued = sessions.create(user_id).await.unwrap();
    let value = issued.value;

    let barrier = Arc::new(tokio::sync::Barrier::new(2));
    let mut handles = Vec::new();
    for _ in 0..2 {
        let sessions = Arc::clone(&sessions);
        let barrier = Arc::clone(&barrier);
        let value = value.clone();
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            sessions.rotate(&value).await
        }));
    }

    let mut successes = 0;
    let mut failures = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(err) => {
                assert_invalid_refresh_token(err);
                failures += 1;
            }
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(failures, 1);
    assert_eq!(repository.count_user_tokens(user_id).await.unwrap(), 1);
}
