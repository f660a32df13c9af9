//! User entity representing a registered account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Role granted to every newly registered user
pub const DEFAULT_ROLE: &str = "USER";

/// Internal marker authority recording that the session was established
/// with a password factor. It is a signal for the authentication layer,
/// not a grantable permission, and is stripped from minted access tokens.
pub const PASSWORD_FACTOR_AUTHORITY: &str = "FACTOR_PASSWORD";

/// User entity representing a registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Email address used as the login identity
    pub email: String,

    /// One-way hash of the user's password
    pub password_hash: String,

    /// Role/authority strings granted to the user
    pub roles: HashSet<String>,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with the default role
    pub fn new(email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            roles: HashSet::from([DEFAULT_ROLE.to_string()]),
            created_at: Utc::now(),
        }
    }

    /// Checks whether the user holds the given role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_gets_default_role() {
        let user = User::new("a@x.com".to_string(), "hash".to_string());

        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.password_hash, "hash");
        assert!(user.has_role(DEFAULT_ROLE));
        assert_eq!(user.roles.len(), 1);
    }

    #[test]
    fn test_user_serialization_round_trip() {
        let mut user = User::new("b@x.com".to_string(), "hash".to_string());
        user.roles.insert("ADMIN".to_string());

        let json = serde_json::to_string(&user).unwrap();
        let deserialized: User = serde_json::from_str(&json).unwrap();

        assert_eq!(user, deserialized);
    }
}
