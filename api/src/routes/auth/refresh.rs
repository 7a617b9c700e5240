use actix_web::{web, HttpResponse};

use crate::dto::{RefreshTokenRequest, SessionResponse};
use crate::handlers::handle_domain_error;
use crate::routes::AppState;

use tn_core::repositories::{
    ConfirmationRepository, PostRepository, TokenRepository, TradeRequestRepository,
    UserRepository,
};
use tn_core::services::mail::Mailer;
use tn_shared::types::ApiResponse;

/// Handler for POST /api/v1/auth/refresh
///
/// Rotates a refresh token: the presented token is revoked and a fresh
/// access/refresh pair is issued.
///
/// # Responses
///
/// - 200 OK: `{ user, tokens }`
/// - 401 Unauthorized: unknown, expired or already revoked refresh token
pub async fn refresh<U, T, C, M, P, R>(
    state: web::Data<AppState<U, T, C, M, P, R>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    C: ConfirmationRepository + 'static,
    M: Mailer + 'static,
    P: PostRepository + 'static,
    R: TradeRequestRepository + 'static,
{
    match state.auth_service.refresh(&request.refresh_token).await {
        Ok(auth) => HttpResponse::Ok().json(ApiResponse::success(SessionResponse::from(auth))),
        Err(error) => handle_domain_error(error),
    }
}
