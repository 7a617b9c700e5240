use actix_web::{web, HttpResponse};

use crate::dto::{LogoutRequest, MessageResponse};
use crate::handlers::handle_domain_error;
use crate::routes::AppState;

use tn_core::repositories::{
    ConfirmationRepository, PostRepository, TokenRepository, TradeRequestRepository,
    UserRepository,
};
use tn_core::services::mail::Mailer;
use tn_shared::types::ApiResponse;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the presented refresh token. Unknown or already revoked tokens
/// still answer 200, so a client can always clear its session.
pub async fn logout<U, T, C, M, P, R>(
    state: web::Data<AppState<U, T, C, M, P, R>>,
    request: web::Json<LogoutRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    C: ConfirmationRepository + 'static,
    M: Mailer + 'static,
    P: PostRepository + 'static,
    R: TradeRequestRepository + 'static,
{
    match state.auth_service.logout(&request.refresh_token).await {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::success(MessageResponse::new("Logged out"))),
        Err(error) => handle_domain_error(error),
    }
}
