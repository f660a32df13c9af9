//! Mapping of domain errors to HTTP responses

use actix_web::HttpResponse;
use tracing::{error, warn};
use validator::ValidationErrors;

use ag_core::errors::{AuthError, DomainError, TokenError};
use ag_shared::errors::{error_codes, ErrorResponse};

/// Convert a domain error into the appropriate HTTP response
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    match error {
        DomainError::Auth(auth_error) => {
            let response: ErrorResponse = auth_error.into();
            match auth_error {
                AuthError::UserAlreadyExists => HttpResponse::Conflict().json(response),
                AuthError::UserNotFound | AuthError::AuthenticationFailed => {
                    HttpResponse::Unauthorized().json(response)
                }
                AuthError::RegistrationDisabled => HttpResponse::Forbidden().json(response),
            }
        }
        DomainError::Token(token_error) => {
            let response: ErrorResponse = token_error.into();
            match token_error {
                // Every token failure is an authorization failure from the
                // client's point of view; the error code carries the detail.
                TokenError::TokenExpired
                | TokenError::InvalidSignature
                | TokenError::MalformedToken
                | TokenError::TokenRevoked
                | TokenError::InvalidRefreshToken
                | TokenError::RefreshTokenExpired => HttpResponse::Unauthorized().json(response),
                TokenError::TokenGenerationFailed => {
                    error!("token generation failed");
                    HttpResponse::InternalServerError().json(ErrorResponse::new(
                        error_codes::INTERNAL_ERROR,
                        "An unexpected error occurred",
                    ))
                }
            }
        }
        DomainError::Validation { message } => HttpResponse::BadRequest().json(
            ErrorResponse::new(error_codes::VALIDATION_ERROR, message.clone()),
        ),
        DomainError::NotFound { resource } => {
            warn!(%resource, "resource not found");
            HttpResponse::NotFound().json(ErrorResponse::new(
                error_codes::NOT_FOUND,
                format!("{} not found", resource),
            ))
        }
        DomainError::Internal { message } => {
            // Internal detail stays in the logs, not on the wire.
            error!(%message, "internal error while handling request");
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                error_codes::INTERNAL_ERROR,
                "An unexpected error occurred",
            ))
        }
    }
}

/// Convert request-body validation failures into a 400 response with
/// per-field details
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let mut response =
        ErrorResponse::new(error_codes::VALIDATION_ERROR, "Request validation failed");

    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        response = response.add_detail(field, messages);
    }

    HttpResponse::BadRequest().json(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_auth_error_statuses() {
        let conflict = handle_domain_error(&DomainError::Auth(AuthError::UserAlreadyExists));
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        // Unknown identity and wrong secret must be indistinguishable
        let not_found = handle_domain_error(&DomainError::Auth(AuthError::UserNotFound));
        let bad_secret = handle_domain_error(&DomainError::Auth(AuthError::AuthenticationFailed));
        assert_eq!(not_found.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(bad_secret.status(), StatusCode::UNAUTHORIZED);

        let disabled = handle_domain_error(&DomainError::Auth(AuthError::RegistrationDisabled));
        assert_eq!(disabled.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_token_error_statuses() {
        for token_error in [
            TokenError::TokenExpired,
            TokenError::InvalidSignature,
            TokenError::MalformedToken,
            TokenError::TokenRevoked,
            TokenError::InvalidRefreshToken,
            TokenError::RefreshTokenExpired,
        ] {
            let response = handle_domain_error(&DomainError::Token(token_error));
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        let generation = handle_domain_error(&DomainError::Token(TokenError::TokenGenerationFailed));
        assert_eq!(generation.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_error_does_not_leak_detail() {
        let response = handle_domain_error(&DomainError::Internal {
            message: "connection refused to db-master-1".to_string(),
        });
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
