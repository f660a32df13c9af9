use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};

use crate::dto::auth::LogoutResponse;
use crate::handlers::error::handle_domain_error;

use ag_core::repositories::{TokenRepository, UserRepository};
use ag_core::services::auth::PasswordHasher;

use super::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the presented access token and deletes the user's refresh
/// tokens, fully ending the session. Logout is best-effort: a missing,
/// malformed, or expired token means there is nothing to revoke, and the
/// request still succeeds.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {access_token}
/// ```
pub async fn logout<U, T, P>(
    req: HttpRequest,
    state: web::Data<AppState<U, T, P>>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    P: PasswordHasher + 'static,
{
    let bearer_token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    match state.auth_service.logout(bearer_token).await {
        Ok(()) => HttpResponse::Ok().json(LogoutResponse {
            message: "Logged out successfully".to_string(),
        }),
        Err(error) => handle_domain_error(&error),
    }
}
