//! Token entities for access-token claims and persisted refresh tokens.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use super::user::PASSWORD_FACTOR_AUTHORITY;

/// Claims structure embedded in a signed access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user identity)
    pub sub: String,

    /// Issued at timestamp (seconds since epoch)
    pub iat: i64,

    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Unique identifier for the token, used as the revocation key
    pub jti: String,

    /// Authority strings granted to the subject
    pub authorities: BTreeSet<String>,
}

impl Claims {
    /// Creates claims for a new access token
    ///
    /// Duplicate authorities collapse into the set and the internal
    /// password-factor marker is filtered out; it must never appear in a
    /// token handed to a client.
    pub fn new(
        subject: impl Into<String>,
        authorities: impl IntoIterator<Item = String>,
        ttl: Duration,
        issuer: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        let authorities = authorities
            .into_iter()
            .filter(|authority| authority != PASSWORD_FACTOR_AUTHORITY)
            .collect();

        Self {
            sub: subject.into(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            iss: issuer.into(),
            jti: Uuid::new_v4().to_string(),
            authorities,
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Expiration as a timestamp value
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

/// Refresh token record persisted by the session layer
///
/// Only a SHA-256 digest of the opaque value is stored; the raw value
/// lives exclusively in the client's hands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Unique identifier for the refresh token
    pub id: Uuid,

    /// User this token belongs to
    pub user_id: Uuid,

    /// Digest of the opaque token value
    pub token_hash: String,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,

    /// Timestamp when the token was created (immutable once set)
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Creates a new refresh token expiring `ttl` from now
    pub fn new(user_id: Uuid, token_hash: String, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            expires_at: now + ttl,
            created_at: now,
        }
    }

    /// Checks if the refresh token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Token pair returned to the client after a successful auth operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed access token
    pub access_token: String,

    /// Opaque refresh token value
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,

    /// Refresh token lifetime in seconds
    pub refresh_expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair
    pub fn new(
        access_token: String,
        refresh_token: String,
        expires_in: i64,
        refresh_expires_in: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
            refresh_expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new(
            "a@x.com",
            ["USER".to_string()],
            Duration::seconds(900),
            "authgate",
        );

        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.iss, "authgate");
        assert_eq!(claims.exp - claims.iat, 900);
        assert!(!claims.is_expired());
        assert!(!claims.jti.is_empty());
        assert!(claims.authorities.contains("USER"));
    }

    #[test]
    fn test_claims_filter_password_factor_marker() {
        let claims = Claims::new(
            "a@x.com",
            [
                "USER".to_string(),
                PASSWORD_FACTOR_AUTHORITY.to_string(),
                "ADMIN".to_string(),
            ],
            Duration::seconds(900),
            "authgate",
        );

        assert!(!claims.authorities.contains(PASSWORD_FACTOR_AUTHORITY));
        assert_eq!(claims.authorities.len(), 2);
    }

    #[test]
    fn test_claims_collapse_duplicate_authorities() {
        let claims = Claims::new(
            "a@x.com",
            ["USER".to_string(), "USER".to_string()],
            Duration::seconds(900),
            "authgate",
        );

        assert_eq!(claims.authorities.len(), 1);
    }

    #[test]
    fn test_claims_expiration() {
        let mut claims = Claims::new("a@x.com", [], Duration::seconds(900), "authgate");
        claims.exp = Utc::now().timestamp() - 1;

        assert!(claims.is_expired());
    }

    #[test]
    fn test_fresh_jti_per_token() {
        let a = Claims::new("a@x.com", [], Duration::seconds(900), "authgate");
        let b = Claims::new("a@x.com", [], Duration::seconds(900), "authgate");

        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_refresh_token_creation() {
        let user_id = Uuid::new_v4();
        let token = RefreshToken::new(user_id, "digest".to_string(), Duration::days(7));

        assert_eq!(token.user_id, user_id);
        assert_eq!(token.token_hash, "digest");
        assert!(!token.is_expired());
        assert!(token.expires_at > token.created_at);
    }

    #[test]
    fn test_refresh_token_expiration() {
        let mut token =
            RefreshToken::new(Uuid::new_v4(), "digest".to_string(), Duration::days(7));
        token.expires_at = Utc::now() - Duration::seconds(1);

        assert!(token.is_expired());
    }

    #[test]
    fn test_token_pair_serialization() {
        let pair = TokenPair::new("access".to_string(), "refresh".to_string(), 900, 604800);

        let json = serde_json::to_string(&pair).unwrap();
        let deserialized: TokenPair = serde_json::from_str(&json).unwrap();

        assert_eq!(pair, deserialized);
    }
}
