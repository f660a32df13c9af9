use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth::{AuthResponse, RefreshTokenRequest};
use crate::handlers::error::{handle_domain_error, validation_error_response};

use ag_core::repositories::{TokenRepository, UserRepository};
use ag_core::services::auth::PasswordHasher;

use super::AppState;

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges a refresh token for a new token pair. The presented value
/// is single-use: it is invalidated by this call, succeed or fail, and a
/// second exchange of the same value is rejected.
///
/// # Request Body
///
/// ```json
/// {
///     "refresh_token": "opaque-value"
/// }
/// ```
///
/// # Responses
/// - 200 OK: rotated token pair
/// - 401 Unauthorized: unknown, already-used, or expired refresh token;
///   the client must authenticate again
pub async fn refresh<U, T, P>(
    state: web::Data<AppState<U, T, P>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    P: PasswordHasher + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state.auth_service.refresh(&request.refresh_token).await {
        Ok(pair) => HttpResponse::Ok().json(AuthResponse::from(pair)),
        Err(error) => handle_domain_error(&error),
    }
}
