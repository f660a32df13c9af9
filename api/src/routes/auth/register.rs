use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth::{AuthResponse, RegisterRequest};
use crate::handlers::error::{handle_domain_error, validation_error_response};

use ag_core::repositories::{TokenRepository, UserRepository};
use ag_core::services::auth::PasswordHasher;

use super::AppState;

/// Handler for POST /api/v1/auth/register
///
/// Creates a new account and returns its first token pair.
///
/// # Request Body
///
/// ```json
/// {
///     "email": "a@x.com",
///     "password": "at-least-8-chars"
/// }
/// ```
///
/// # Responses
/// - 201 Created: token pair for the new account
/// - 400 Bad Request: request validation failed
/// - 409 Conflict: email already registered
pub async fn register<U, T, P>(
    state: web::Data<AppState<U, T, P>>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    P: PasswordHasher + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state
        .auth_service
        .register(&request.email, &request.password)
        .await
    {
        Ok(pair) => HttpResponse::Created().json(AuthResponse::from(pair)),
        Err(error) => handle_domain_error(&error),
    }
}
