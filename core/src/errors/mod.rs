//! Domain-specific error types for authentication and token operations.

use thiserror::Error;

use ag_shared::errors::{error_codes, ErrorResponse};

/// Authentication-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Email already registered")]
    UserAlreadyExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Registration disabled")]
    RegistrationDisabled,
}

/// Token-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Token revoked")]
    TokenRevoked,

    #[error("Refresh token not found or already used")]
    InvalidRefreshToken,

    #[error("Refresh token has expired")]
    RefreshTokenExpired,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Convert AuthError to a wire-level ErrorResponse
impl From<&AuthError> for ErrorResponse {
    fn from(err: &AuthError) -> Self {
        let error_code = match err {
            AuthError::UserAlreadyExists => error_codes::EMAIL_ALREADY_EXISTS,
            // Unknown identity and wrong secret are indistinguishable on
            // the wire to avoid account enumeration.
            AuthError::UserNotFound | AuthError::AuthenticationFailed => {
                error_codes::INVALID_CREDENTIALS
            }
            AuthError::RegistrationDisabled => error_codes::REGISTRATION_DISABLED,
        };

        ErrorResponse::new(error_code, err.to_string())
    }
}

/// Convert TokenError to a wire-level ErrorResponse
impl From<&TokenError> for ErrorResponse {
    fn from(err: &TokenError) -> Self {
        let error_code = match err {
            TokenError::TokenExpired => error_codes::TOKEN_EXPIRED,
            TokenError::TokenRevoked => error_codes::TOKEN_REVOKED,
            TokenError::InvalidSignature
            | TokenError::MalformedToken
            | TokenError::TokenGenerationFailed => error_codes::TOKEN_INVALID,
            TokenError::InvalidRefreshToken | TokenError::RefreshTokenExpired => {
                error_codes::INVALID_REFRESH_TOKEN
            }
        };

        ErrorResponse::new(error_code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_errors_share_one_wire_code() {
        let not_found: ErrorResponse = (&AuthError::UserNotFound).into();
        let bad_secret: ErrorResponse = (&AuthError::AuthenticationFailed).into();

        assert_eq!(not_found.error, error_codes::INVALID_CREDENTIALS);
        assert_eq!(bad_secret.error, error_codes::INVALID_CREDENTIALS);
    }

    #[test]
    fn test_refresh_token_errors_map_to_same_code() {
        let missing: ErrorResponse = (&TokenError::InvalidRefreshToken).into();
        let expired: ErrorResponse = (&TokenError::RefreshTokenExpired).into();

        assert_eq!(missing.error, error_codes::INVALID_REFRESH_TOKEN);
        assert_eq!(expired.error, error_codes::INVALID_REFRESH_TOKEN);
        assert_ne!(missing.message, expired.message);
    }

    #[test]
    fn test_domain_error_from_token_error() {
        let err: DomainError = TokenError::TokenExpired.into();
        assert!(matches!(err, DomainError::Token(TokenError::TokenExpired)));
    }
}
