//! JWT authentication middleware for protecting API endpoints.
//!
//! The middleware extracts the bearer token from the Authorization header,
//! verifies it through the [`AccessTokenVerifier`] registered as app data,
//! and injects an [`AuthContext`] into the request extensions. Handlers
//! behind the middleware receive the context through its `FromRequest`
//! extractor. Rejections short-circuit with the standard JSON error body.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use uuid::Uuid;

use tn_core::domain::entities::token::Claims;
use tn_core::errors::{DomainError, TokenError};
use tn_core::repositories::TokenRepository;
use tn_core::services::token::TokenService;

use crate::handlers::error::handle_domain_error;

/// Authenticated caller, injected into request extensions
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// User id from the token's subject claim
    pub user_id: Uuid,
    /// JWT id, usable for request correlation
    pub jti: String,
}

impl AuthContext {
    /// Build a context from verified JWT claims
    pub fn from_claims(claims: Claims) -> Result<Self, DomainError> {
        let user_id = claims
            .user_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidClaims))?;
        Ok(Self {
            user_id,
            jti: claims.jti,
        })
    }
}

/// Verifier port the middleware resolves from app data
///
/// Keeps the middleware independent of the concrete repository behind
/// the token service.
pub trait AccessTokenVerifier: Send + Sync {
    fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError>;
}

impl<R: TokenRepository> AccessTokenVerifier for TokenService<R> {
    fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        // Resolves to the inherent method on TokenService
        self.verify_access_token(token)
    }
}

/// JWT authentication middleware factory
pub struct JwtAuth;

impl JwtAuth {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JwtAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => return Ok(reject(req, DomainError::Unauthorized)),
            };

            let verification = match req.app_data::<web::Data<Arc<dyn AccessTokenVerifier>>>() {
                Some(verifier) => verifier
                    .verify_access_token(&token)
                    .and_then(AuthContext::from_claims),
                None => Err(DomainError::Internal {
                    message: "access token verifier is not configured".to_string(),
                }),
            };

            let context = match verification {
                Ok(context) => context,
                Err(error) => return Ok(reject(req, error)),
            };

            req.extensions_mut().insert(context);

            service
                .call(req)
                .await
                .map(|res| res.map_into_left_body())
        })
    }
}

/// Extracts the bearer token from the Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

/// Short-circuits the request with the standard JSON error body
///
/// Materialized here rather than returned as a service error so that
/// outer middleware still decorates the response.
fn reject<B>(req: ServiceRequest, error: DomainError) -> ServiceResponse<EitherBody<B>> {
    let response = handle_domain_error(error);
    req.into_response(response).map_into_right_body()
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req.extensions().get::<AuthContext>().cloned().ok_or_else(|| {
            let response = handle_domain_error(DomainError::Unauthorized);
            InternalError::from_response("authentication context is missing", response).into()
        });

        ready(result)
    }
}
