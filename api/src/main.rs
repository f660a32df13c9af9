//! AuthGate API server binary

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use chrono::Duration;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use ag_api::routes::AppState;
use ag_api::{middleware, routes};
use ag_core::services::auth::{AuthService, AuthServiceConfig};
use ag_core::services::session::SessionManager;
use ag_core::services::token::{
    RevocationRegistry, TokenCleanupConfig, TokenCleanupService, TokenSigner, TokenSignerConfig,
};
use ag_infra::{create_pool, BcryptPasswordHasher, MySqlTokenRepository, MySqlUserRepository};
use ag_shared::config::{AppConfig, LoggingConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(&config.logging);
    config.validate().context("invalid configuration")?;

    if config.jwt.is_using_default_secret() {
        if config.environment.is_production() {
            anyhow::bail!("JWT_SECRET must be set in production");
        }
        warn!("using the default JWT secret; set JWT_SECRET before deploying");
    }

    info!(environment = %config.environment, "starting AuthGate API server");

    let pool = create_pool(&config.database)
        .await
        .context("failed to connect to the database")?;

    // Repositories and external services
    let user_repository = Arc::new(MySqlUserRepository::new(pool.clone()));
    let token_repository = Arc::new(MySqlTokenRepository::new(pool));
    let password_hasher = Arc::new(BcryptPasswordHasher::default());

    // Token lifecycle engine; the revocation registry lives for the
    // whole process
    let token_signer = Arc::new(TokenSigner::new(TokenSignerConfig {
        secret: config.jwt.secret.clone(),
        issuer: config.jwt.issuer.clone(),
    }));
    let revocation_registry = Arc::new(RevocationRegistry::new());
    let session_manager = Arc::new(SessionManager::new(
        Arc::clone(&token_repository),
        Duration::seconds(config.jwt.refresh_token_ttl),
    ));

    let auth_service = Arc::new(AuthService::new(
        user_repository,
        session_manager,
        token_signer,
        Arc::clone(&revocation_registry),
        password_hasher,
        AuthServiceConfig {
            access_token_ttl_seconds: config.jwt.access_token_ttl,
            allow_registration: true,
        },
    ));

    // Periodic deletion of expired refresh tokens and revocation entries
    let cleanup_service = Arc::new(TokenCleanupService::new(
        Arc::clone(&token_repository),
        Arc::clone(&revocation_registry),
        TokenCleanupConfig::default(),
    ));
    cleanup_service.start_background_task();

    let app_state = web::Data::new(AppState { auth_service });
    let bind_address = config.server.bind_address();
    let environment = config.environment;
    let workers = config.server.workers;

    info!(%bind_address, "listening for connections");

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(middleware::cors::create_cors(environment))
            .app_data(app_state.clone())
            .configure(
                routes::auth::configure::<
                    MySqlUserRepository,
                    MySqlTokenRepository,
                    BcryptPasswordHasher,
                >,
            )
            .route("/health", web::get().to(routes::health::health_check))
    });
    if workers > 0 {
        server = server.workers(workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    Ok(())
}

fn init_tracing(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
