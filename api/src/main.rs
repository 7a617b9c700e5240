use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tn_api::app::create_app;
use tn_api::middleware::AccessTokenVerifier;
use tn_api::routes::AppState;
use tn_api::uploads::UploadStore;

use tn_core::services::auth::{AuthService, PasswordHasher};
use tn_core::services::confirmation::{ConfirmationConfig, ConfirmationService};
use tn_core::services::post::{PostService, PostServiceConfig};
use tn_core::services::token::{TokenConfig, TokenService};
use tn_core::services::trade::TradeService;
use tn_core::services::user::UserService;

use tn_infra::database::{
    DatabasePool, MySqlConfirmationRepository, MySqlPostRepository, MySqlTokenRepository,
    MySqlTradeRequestRepository, MySqlUserRepository,
};
use tn_infra::mail::create_mailer;

use tn_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.environment.default_log_level())),
        )
        .init();

    info!(
        environment = %config.environment,
        "Starting TradeNest API server"
    );

    // Database
    let pool = DatabasePool::new(&config.database)
        .await
        .context("Failed to connect to the database")?;
    pool.run_migrations()
        .await
        .context("Failed to run database migrations")?;

    // Repositories
    let user_repository = Arc::new(MySqlUserRepository::new(pool.get_pool().clone()));
    let confirmation_repository =
        Arc::new(MySqlConfirmationRepository::new(pool.get_pool().clone()));
    let post_repository = Arc::new(MySqlPostRepository::new(pool.get_pool().clone()));
    let trade_repository = Arc::new(MySqlTradeRequestRepository::new(pool.get_pool().clone()));

    // Services
    let token_service = Arc::new(TokenService::new(
        MySqlTokenRepository::new(pool.get_pool().clone()),
        TokenConfig::from(&config.auth),
    ));
    let mailer = Arc::new(create_mailer(&config.mail).context("Failed to set up the mailer")?);
    let confirmation_service = Arc::new(ConfirmationService::new(
        confirmation_repository,
        mailer,
        ConfirmationConfig {
            ttl_seconds: config.auth.confirmation_token_expiry,
            public_base_url: config.server.public_base_url.clone(),
        },
    ));
    let auth_service = Arc::new(AuthService::new(
        user_repository.clone(),
        token_service.clone(),
        confirmation_service,
        PasswordHasher::new(config.auth.bcrypt_cost),
    ));
    let user_service = Arc::new(UserService::new(
        user_repository.clone(),
        token_service.clone(),
    ));
    let post_service = Arc::new(PostService::new(
        post_repository.clone(),
        PostServiceConfig::from(&config.uploads),
    ));
    let trade_service = Arc::new(TradeService::new(trade_repository, post_repository));

    // Upload storage
    let uploads = UploadStore::new(&config.uploads);
    uploads
        .ensure_dir()
        .context("Failed to create the upload directory")?;

    let state = web::Data::new(AppState {
        auth_service,
        user_service,
        post_service,
        trade_service,
        uploads,
    });
    let verifier: Arc<dyn AccessTokenVerifier> = token_service;
    let verifier = web::Data::new(verifier);

    let bind_address = config.server.bind_address();
    let workers = config.server.workers;
    let keep_alive = Duration::from_secs(config.server.keep_alive);
    info!(address = %bind_address, "Server listening");

    let mut server = HttpServer::new(move || create_app(state.clone(), verifier.clone()))
        .keep_alive(keep_alive)
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    if workers > 0 {
        server = server.workers(workers);
    }

    server.run().await?;
    Ok(())
}
