//! Main authentication service implementation

use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::entities::token::{Claims, TokenPair};
use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainResult, TokenError};
use crate::repositories::{TokenRepository, UserRepository};
use crate::services::session::SessionManager;
use crate::services::token::{RevocationRegistry, TokenSigner};

use super::config::AuthServiceConfig;
use super::password::PasswordHasher;

/// Authentication service orchestrating the complete token lifecycle
///
/// An access token and the refresh token issued with it are independent
/// after issuance: revoking one does not revoke the other. Logout is the
/// one place both invalidation paths run together.
pub struct AuthService<U, T, P>
where
    U: UserRepository,
    T: TokenRepository,
    P: PasswordHasher,
{
    /// User directory for credential lookup and role data
    user_repository: Arc<U>,
    /// Session manager for refresh-token state
    session_manager: Arc<SessionManager<T>>,
    /// Signer for access tokens
    token_signer: Arc<TokenSigner>,
    /// Registry of revoked access-token identifiers
    revocation_registry: Arc<RevocationRegistry>,
    /// Password hashing service
    password_hasher: Arc<P>,
    /// Service configuration
    config: AuthServiceConfig,
}

impl<U, T, P> AuthService<U, T, P>
where
    U: UserRepository,
    T: TokenRepository,
    P: PasswordHasher,
{
    /// Create a new authentication service
    pub fn new(
        user_repository: Arc<U>,
        session_manager: Arc<SessionManager<T>>,
        token_signer: Arc<TokenSigner>,
        revocation_registry: Arc<RevocationRegistry>,
        password_hasher: Arc<P>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            session_manager,
            token_signer,
            revocation_registry,
            password_hasher,
            config,
        }
    }

    /// Register a new user and issue their first token pair
    ///
    /// The password is stored only as a one-way hash. New users receive
    /// the default role.
    ///
    /// # Errors
    ///
    /// * [`AuthError::UserAlreadyExists`] - the email is taken
    /// * [`AuthError::RegistrationDisabled`] - registration switched off
    pub async fn register(&self, email: &str, password: &str) -> DomainResult<TokenPair> {
        if !self.config.allow_registration {
            return Err(AuthError::RegistrationDisabled.into());
        }

        if self.user_repository.exists_by_email(email).await? {
            warn!(email, "registration rejected: email already registered");
            return Err(AuthError::UserAlreadyExists.into());
        }

        let password_hash = self.password_hasher.hash(password).await?;
        let user = self
            .user_repository
            .create(User::new(email.to_string(), password_hash))
            .await?;

        info!(user_id = %user.id, "registered new user");
        self.issue_token_pair(&user).await
    }

    /// Authenticate a user by credentials and issue a token pair
    ///
    /// # Errors
    ///
    /// * [`AuthError::UserNotFound`] - unknown identity
    /// * [`AuthError::AuthenticationFailed`] - wrong password
    ///
    /// Both map to the same response on the wire; the distinction exists
    /// only for internal logging.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<TokenPair> {
        let user = self
            .user_repository
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let password_matches = self
            .password_hasher
            .verify(password, &user.password_hash)
            .await?;
        if !password_matches {
            warn!(user_id = %user.id, "login failed: invalid credentials");
            return Err(AuthError::AuthenticationFailed.into());
        }

        info!(user_id = %user.id, "user logged in");
        self.issue_token_pair(&user).await
    }

    /// Verify a bearer access token for request authorization
    ///
    /// Layers the revocation check over signature and expiry
    /// verification: a revoked identifier is rejected even though the
    /// token itself would still verify.
    pub fn verify_access_token(&self, bearer_token: &str) -> DomainResult<Claims> {
        let token = bearer_token
            .strip_prefix("Bearer ")
            .unwrap_or(bearer_token)
            .trim();

        let claims = self.token_signer.verify(token)?;
        if self.revocation_registry.is_revoked(&claims.jti) {
            return Err(TokenError::TokenRevoked.into());
        }

        Ok(claims)
    }

    /// End the session behind a presented access token, best-effort
    ///
    /// If the token verifies, its identifier is revoked until the token's
    /// natural expiry and the user's refresh tokens are deleted, fully
    /// closing the session. A malformed, expired, or otherwise invalid
    /// token leaves nothing to revoke — logout still succeeds.
    pub async fn logout(&self, bearer_token: &str) -> DomainResult<()> {
        let token = bearer_token
            .strip_prefix("Bearer ")
            .unwrap_or(bearer_token)
            .trim();

        let claims = match self.token_signer.verify(token) {
            Ok(claims) => claims,
            Err(_) => {
                debug!("logout with invalid access token; nothing to revoke");
                return Ok(());
            }
        };

        self.revocation_registry
            .revoke(&claims.jti, claims.expires_at());

        if let Some(user) = self.user_repository.find_by_email(&claims.sub).await? {
            let removed = self.session_manager.invalidate(user.id).await?;
            info!(user_id = %user.id, removed, "user logged out");
        }

        Ok(())
    }

    /// Exchange a refresh-token value for a fresh token pair
    ///
    /// Rotation is single-use: the presented value is invalidated whether
    /// or not the exchange succeeds, and a replay of it always fails.
    ///
    /// # Errors
    ///
    /// * [`crate::errors::TokenError::InvalidRefreshToken`]
    /// * [`crate::errors::TokenError::RefreshTokenExpired`]
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<TokenPair> {
        let issued = self.session_manager.rotate(refresh_token).await?;

        let user = match self.user_repository.find_by_id(issued.token.user_id).await? {
            Some(user) => user,
            None => {
                // The owner was deleted between issuance and rotation;
                // drop the session the rotation just re-created.
                warn!(user_id = %issued.token.user_id, "refresh for deleted user");
                self.session_manager.invalidate(issued.token.user_id).await?;
                return Err(AuthError::UserNotFound.into());
            }
        };

        let access_token =
            self.token_signer
                .mint(&user.email, &user.roles, self.access_token_ttl())?;

        debug!(user_id = %user.id, "rotated token pair");
        Ok(self.token_pair(access_token, issued.value))
    }

    async fn issue_token_pair(&self, user: &User) -> DomainResult<TokenPair> {
        let access_token =
            self.token_signer
                .mint(&user.email, &user.roles, self.access_token_ttl())?;
        let issued = self.session_manager.create(user.id).await?;

        Ok(self.token_pair(access_token, issued.value))
    }

    fn token_pair(&self, access_token: String, refresh_token: String) -> TokenPair {
        TokenPair::new(
            access_token,
            refresh_token,
            self.config.access_token_ttl_seconds,
            self.session_manager.token_ttl().num_seconds(),
        )
    }

    fn access_token_ttl(&self) -> Duration {
        Duration::seconds(self.config.access_token_ttl_seconds)
    }
}
