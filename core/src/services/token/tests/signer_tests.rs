//! Tests for access token minting and verification

use chrono::Duration;
use std::collections::HashSet;

use crate::domain::entities::user::PASSWORD_FACTOR_AUTHORITY;
use crate::errors::{DomainError, TokenError};
use crate::services::token::{TokenSigner, TokenSignerConfig};

fn signer() -> TokenSigner {
    TokenSigner::new(TokenSignerConfig {
        secret: "test-secret-key-for-signing".to_string(),
        issuer: "authgate".to_string(),
    })
}

fn roles(values: &[&str]) -> HashSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn test_mint_verify_round_trip() {
    let signer = signer();

    let token = signer
        .mint("a@x.com", &roles(&["USER", "ADMIN"]), Duration::seconds(900))
        .unwrap();
    let claims = signer.verify(&token).unwrap();

    assert_eq!(claims.sub, "a@x.com");
    assert_eq!(claims.iss, "authgate");
    assert!(claims.authorities.contains("USER"));
    assert!(claims.authorities.contains("ADMIN"));
    assert_eq!(claims.exp - claims.iat, 900);
}

#[test]
fn test_mint_filters_internal_marker_authority() {
    let signer = signer();

    let token = signer
        .mint(
            "a@x.com",
            &roles(&["USER", PASSWORD_FACTOR_AUTHORITY]),
            Duration::seconds(900),
        )
        .unwrap();
    let claims = signer.verify(&token).unwrap();

    assert!(!claims.authorities.contains(PASSWORD_FACTOR_AUTHORITY));
    assert!(claims.authorities.contains("USER"));
}

#[test]
fn test_verify_rejects_expired_token() {
    let signer = signer();

    let token = signer
        .mint("a@x.com", &roles(&["USER"]), Duration::seconds(-10))
        .unwrap();

    let err = signer.verify(&token).unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::TokenExpired)));
}

#[test]
fn test_verify_rejects_wrong_secret() {
    let signer = signer();
    let other = TokenSigner::new(TokenSignerConfig {
        secret: "a-different-secret".to_string(),
        issuer: "authgate".to_string(),
    });

    let token = signer
        .mint("a@x.com", &roles(&["USER"]), Duration::seconds(900))
        .unwrap();

    let err = other.verify(&token).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token(TokenError::InvalidSignature)
    ));
}

#[test]
fn test_verify_rejects_garbage() {
    let signer = signer();

    for garbage in ["", "not-a-token", "aaa.bbb.ccc"] {
        let err = signer.verify(garbage).unwrap_err();
        assert!(
            matches!(err, DomainError::Token(TokenError::MalformedToken)),
            "expected MalformedToken for {:?}",
            garbage
        );
    }
}

#[test]
fn test_each_token_gets_fresh_jti() {
    let signer = signer();
    let authorities = roles(&["USER"]);

    let first = signer
        .mint("a@x.com", &authorities, Duration::seconds(900))
        .unwrap();
    let second = signer
        .mint("a@x.com", &authorities, Duration::seconds(900))
        .unwrap();

    let first_claims = signer.verify(&first).unwrap();
    let second_claims = signer.verify(&second).unwrap();
    assert_ne!(first_claims.jti, second_claims.jti);
}
