//! Configuration for the token signer

/// Configuration for the token signer
#[derive(Debug, Clone)]
pub struct TokenSignerConfig {
    /// Shared symmetric key used for signing and verifying access tokens
    pub secret: String,
    /// Issuer claim embedded in every minted token
    pub issuer: String,
}

impl Default for TokenSignerConfig {
    fn default() -> Self {
        Self {
            secret: "development-secret-please-change-in-production".to_string(),
            issuer: "authgate".to_string(),
        }
    }
}
