//! Application factory
//!
//! Builds the Actix-web application from an [`AppState`]: middleware
//! stack, route tree, health check and the 404 fallback. The factory is
//! shared between `main` and the integration tests.

use std::sync::Arc;

use actix_web::{web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use crate::middleware::{create_cors, AccessTokenVerifier, JwtAuth, SecurityMiddleware};
use crate::routes::{auth, posts, trades, users, AppState};

use tn_core::repositories::{
    ConfirmationRepository, PostRepository, TokenRepository, TradeRequestRepository,
    UserRepository,
};
use tn_core::services::mail::Mailer;
use tn_shared::config::ServerConfig;
use tn_shared::errors::{error_codes, ErrorResponse};
use tn_shared::types::HealthResponse;

/// Create and configure the application with all dependencies
///
/// The feed and post detail are public; everything under `/users` and
/// `/trades` requires a bearer token, as do the mutating post routes.
pub fn create_app<U, T, C, M, P, R>(
    app_state: web::Data<AppState<U, T, C, M, P, R>>,
    verifier: web::Data<Arc<dyn AccessTokenVerifier>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    C: ConfirmationRepository + 'static,
    M: Mailer + 'static,
    P: PostRepository + 'static,
    R: TradeRequestRepository + 'static,
{
    let server = ServerConfig::from_env();
    let cors = create_cors(&server.cors);

    App::new()
        .app_data(app_state)
        .app_data(verifier)
        .app_data(web::PayloadConfig::new(server.max_payload_size))
        // Middleware runs bottom-up: security headers, then CORS, then the
        // request span
        .wrap(TracingLogger::default())
        .wrap(cors)
        .wrap(SecurityMiddleware::new())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register::<U, T, C, M, P, R>))
                        .route("/login", web::post().to(auth::login::<U, T, C, M, P, R>))
                        .route("/logout", web::post().to(auth::logout::<U, T, C, M, P, R>))
                        .route("/refresh", web::post().to(auth::refresh::<U, T, C, M, P, R>))
                        .route(
                            "/confirm-email/{token}",
                            web::post().to(auth::confirm_email::<U, T, C, M, P, R>),
                        )
                        .route(
                            "/resend-confirmation",
                            web::post().to(auth::resend_confirmation::<U, T, C, M, P, R>),
                        )
                        .route(
                            "/username/{username}",
                            web::get().to(auth::username_available::<U, T, C, M, P, R>),
                        )
                        .route(
                            "/email/{email}",
                            web::get().to(auth::email_available::<U, T, C, M, P, R>),
                        ),
                )
                .service(
                    web::scope("/users")
                        .wrap(JwtAuth::new())
                        .route("/me", web::get().to(users::profile::<U, T, C, M, P, R>))
                        .route("/me", web::put().to(users::update_profile::<U, T, C, M, P, R>))
                        .route(
                            "/me",
                            web::delete().to(users::disable_account::<U, T, C, M, P, R>),
                        ),
                )
                .service(
                    web::scope("/posts")
                        .route("", web::get().to(posts::feed::<U, T, C, M, P, R>))
                        .route(
                            "",
                            web::post()
                                .to(posts::create_post::<U, T, C, M, P, R>)
                                .wrap(JwtAuth::new()),
                        )
                        .route("/{id}", web::get().to(posts::post_detail::<U, T, C, M, P, R>))
                        .route(
                            "/{id}",
                            web::put()
                                .to(posts::update_post::<U, T, C, M, P, R>)
                                .wrap(JwtAuth::new()),
                        )
                        .route(
                            "/{id}",
                            web::delete()
                                .to(posts::delete_post::<U, T, C, M, P, R>)
                                .wrap(JwtAuth::new()),
                        )
                        .route(
                            "/{id}/images",
                            web::delete()
                                .to(posts::remove_images::<U, T, C, M, P, R>)
                                .wrap(JwtAuth::new()),
                        ),
                )
                .service(
                    web::scope("/trades")
                        .wrap(JwtAuth::new())
                        .route("", web::post().to(trades::create_trade::<U, T, C, M, P, R>))
                        .route("/sent", web::get().to(trades::sent_trades::<U, T, C, M, P, R>))
                        .route(
                            "/received",
                            web::get().to(trades::received_trades::<U, T, C, M, P, R>),
                        )
                        .route("/{id}", web::get().to(trades::trade_detail::<U, T, C, M, P, R>))
                        .route(
                            "/{id}/accept",
                            web::post().to(trades::accept_trade::<U, T, C, M, P, R>),
                        )
                        .route(
                            "/{id}/decline",
                            web::post().to(trades::decline_trade::<U, T, C, M, P, R>),
                        )
                        .route(
                            "/{id}/cancel",
                            web::post().to(trades::cancel_trade::<U, T, C, M, P, R>),
                        ),
                ),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
