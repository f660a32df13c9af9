//! JWT authentication configuration

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Smallest token lifetime the service accepts, in seconds
pub const MIN_TOKEN_TTL_SECONDS: i64 = 60;

/// JWT authentication configuration
///
/// Recognized options:
/// - `secret` - shared symmetric key for signing and verifying access tokens
/// - `access_token_ttl` - access token lifetime in seconds (minimum 60)
/// - `refresh_token_ttl` - refresh token lifetime in seconds (minimum 60)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// JWT secret key for signing tokens
    pub secret: String,

    /// Access token lifetime in seconds
    pub access_token_ttl: i64,

    /// Refresh token lifetime in seconds
    pub refresh_token_ttl: i64,

    /// JWT issuer claim
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from("development-secret-please-change-in-production"),
            access_token_ttl: 900,      // 15 minutes
            refresh_token_ttl: 604800,  // 7 days
            issuer: default_issuer(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token lifetime in seconds
    pub fn with_access_token_ttl(mut self, seconds: i64) -> Self {
        self.access_token_ttl = seconds;
        self
    }

    /// Set refresh token lifetime in seconds
    pub fn with_refresh_token_ttl(mut self, seconds: i64) -> Self {
        self.refresh_token_ttl = seconds;
        self
    }

    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .unwrap_or_else(|_| "development-secret-please-change-in-production".to_string());
        let access_token_ttl = std::env::var("JWT_ACCESS_TOKEN_TTL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(900);
        let refresh_token_ttl = std::env::var("JWT_REFRESH_TOKEN_TTL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(604800);
        let issuer = std::env::var("JWT_ISSUER").unwrap_or_else(|_| default_issuer());

        Self {
            secret,
            access_token_ttl,
            refresh_token_ttl,
            issuer,
        }
    }

    /// Validate the configuration surface
    ///
    /// The secret must be non-empty and both token lifetimes must be at
    /// least [`MIN_TOKEN_TTL_SECONDS`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.trim().is_empty() {
            return Err(ConfigError::invalid("jwt.secret", "must not be empty"));
        }
        if self.access_token_ttl < MIN_TOKEN_TTL_SECONDS {
            return Err(ConfigError::invalid(
                "jwt.access_token_ttl",
                format!("must be at least {} seconds", MIN_TOKEN_TTL_SECONDS),
            ));
        }
        if self.refresh_token_ttl < MIN_TOKEN_TTL_SECONDS {
            return Err(ConfigError::invalid(
                "jwt.refresh_token_ttl",
                format!("must be at least {} seconds", MIN_TOKEN_TTL_SECONDS),
            ));
        }
        Ok(())
    }

    /// Check if using the default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == "development-secret-please-change-in-production"
    }
}

fn default_issuer() -> String {
    String::from("authgate")
}
