//! Access token minting and verification

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::collections::HashSet;

use crate::domain::entities::token::Claims;
use crate::errors::{DomainError, TokenError};

use super::config::TokenSignerConfig;

/// Mints and verifies signed access tokens
///
/// Verification checks signature and expiry only; revocation is layered
/// on top by the caller via [`super::RevocationRegistry`].
pub struct TokenSigner {
    config: TokenSignerConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenSigner {
    /// Creates a new token signer from its configuration
    pub fn new(config: TokenSignerConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.validate_exp = true;
        // Clock skew handling is out of scope; expiry is compared exactly.
        validation.leeway = 0;

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Mints a signed access token for `subject` with the given lifetime
    ///
    /// Embeds a fresh random identifier (`jti`), issued-at/expires-at
    /// timestamps, and the authority set (duplicates collapsed, internal
    /// marker authority filtered — see [`Claims::new`]).
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The compact signed token
    /// * `Err(DomainError)` - Token generation failed
    pub fn mint(
        &self,
        subject: &str,
        authorities: &HashSet<String>,
        ttl: Duration,
    ) -> Result<String, DomainError> {
        let claims = Claims::new(
            subject,
            authorities.iter().cloned(),
            ttl,
            self.config.issuer.clone(),
        );

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    /// Verifies a signed access token and returns its claims
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The decoded claims if signature and expiry check out
    /// * `Err(DomainError)` - Expired, bad signature, or malformed
    pub fn verify(&self, token: &str) -> Result<Claims, DomainError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                let token_error = match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        TokenError::InvalidSignature
                    }
                    _ => TokenError::MalformedToken,
                };
                DomainError::Token(token_error)
            })?;

        Ok(token_data.claims)
    }
}
