use actix_web::{web, HttpResponse};
use tracing::info;

use crate::dto::{LoginRequest, SessionResponse};
use crate::handlers::handle_domain_error;
use crate::routes::AppState;

use tn_core::repositories::{
    ConfirmationRepository, PostRepository, TokenRepository, TradeRequestRepository,
    UserRepository,
};
use tn_core::services::mail::Mailer;
use tn_shared::types::ApiResponse;

/// Handler for POST /api/v1/auth/login
///
/// Verifies the credentials and issues an access token and a refresh token.
///
/// # Responses
///
/// - 200 OK: `{ user, tokens }`
/// - 401 Unauthorized: unknown username or wrong password
/// - 403 Forbidden: account not confirmed yet, or disabled
pub async fn login<U, T, C, M, P, R>(
    state: web::Data<AppState<U, T, C, M, P, R>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    C: ConfirmationRepository + 'static,
    M: Mailer + 'static,
    P: PostRepository + 'static,
    R: TradeRequestRepository + 'static,
{
    match state
        .auth_service
        .login(&request.username, &request.password)
        .await
    {
        Ok(auth) => {
            info!(user_id = %auth.user_id, "User logged in");
            HttpResponse::Ok().json(ApiResponse::success(SessionResponse::from(auth)))
        }
        Err(error) => handle_domain_error(error),
    }
}
