//! Configuration for the authentication service

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Access token lifetime in seconds
    pub access_token_ttl_seconds: i64,
    /// Whether to allow registration of new users
    pub allow_registration: bool,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            access_token_ttl_seconds: 900, // 15 minutes
            allow_registration: true,
        }
    }
}
