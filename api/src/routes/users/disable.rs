use actix_web::{web, HttpResponse};
use tracing::info;

use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;
use crate::routes::AppState;

use tn_core::repositories::{
    ConfirmationRepository, PostRepository, TokenRepository, TradeRequestRepository,
    UserRepository,
};
use tn_core::services::mail::Mailer;

/// Handler for DELETE /api/v1/users/me
///
/// Soft-disables the account and revokes every refresh token. Posts and
/// trade requests keep their author.
pub async fn disable_account<U, T, C, M, P, R>(
    context: AuthContext,
    state: web::Data<AppState<U, T, C, M, P, R>>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    C: ConfirmationRepository + 'static,
    M: Mailer + 'static,
    P: PostRepository + 'static,
    R: TradeRequestRepository + 'static,
{
    match state.user_service.disable_account(context.user_id).await {
        Ok(()) => {
            info!(user_id = %context.user_id, "Account disabled");
            HttpResponse::NoContent().finish()
        }
        Err(error) => handle_domain_error(error),
    }
}
