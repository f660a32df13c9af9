//! Authentication route handlers
//!
//! The four operations of the auth core: registration, login, logout,
//! and refresh-token exchange.

pub mod login;
pub mod logout;
pub mod refresh;
pub mod register;

use actix_web::web;
use std::sync::Arc;

use ag_core::repositories::{TokenRepository, UserRepository};
use ag_core::services::auth::{AuthService, PasswordHasher};

/// Application state holding the shared auth service
pub struct AppState<U, T, P>
where
    U: UserRepository,
    T: TokenRepository,
    P: PasswordHasher,
{
    pub auth_service: Arc<AuthService<U, T, P>>,
}

/// Register the auth routes under `/api/v1/auth`
pub fn configure<U, T, P>(cfg: &mut web::ServiceConfig)
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    P: PasswordHasher + 'static,
{
    cfg.service(
        web::scope("/api/v1/auth")
            .route("/register", web::post().to(register::register::<U, T, P>))
            .route("/login", web::post().to(login::login::<U, T, P>))
            .route("/logout", web::post().to(logout::logout::<U, T, P>))
            .route("/refresh", web::post().to(refresh::refresh::<U, T, P>)),
    );
}
