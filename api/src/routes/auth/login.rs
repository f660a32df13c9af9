use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth::{AuthResponse, LoginRequest};
use crate::handlers::error::{handle_domain_error, validation_error_response};

use ag_core::repositories::{TokenRepository, UserRepository};
use ag_core::services::auth::PasswordHasher;

use super::AppState;

/// Handler for POST /api/v1/auth/login
///
/// Authenticates by email and password and returns a fresh token pair.
/// Any previous session for the account is superseded.
///
/// # Responses
/// - 200 OK: token pair
/// - 400 Bad Request: request validation failed
/// - 401 Unauthorized: invalid credentials (unknown email and wrong
///   password are not distinguished)
pub async fn login<U, T, P>(
    state: web::Data<AppState<U, T, P>>,
    request: web::Json<LoginRequest>,
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
        .login(&request.email, &request.password)
        .await
    {
        Ok(pair) => HttpResponse::Ok().json(AuthResponse::from(pair)),
        Err(error) => handle_domain_error(&error),
    }
}
