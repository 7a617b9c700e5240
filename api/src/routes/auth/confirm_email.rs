use actix_web::{web, HttpResponse};
use tracing::info;
use validator::Validate;

use crate::dto::{MessageResponse, ResendConfirmationRequest, UserDto};
use crate::handlers::{handle_domain_error, handle_validation_errors};
use crate::routes::AppState;

use tn_core::repositories::{
    ConfirmationRepository, PostRepository, TokenRepository, TradeRequestRepository,
    UserRepository,
};
use tn_core::services::mail::Mailer;
use tn_shared::types::ApiResponse;

/// Handler for POST /api/v1/auth/confirm-email/{token}
///
/// Consumes the emailed confirmation token and activates the account.
/// Tokens are single use; a second call with the same token answers 400.
pub async fn confirm_email<U, T, C, M, P, R>(
    state: web::Data<AppState<U, T, C, M, P, R>>,
    token: web::Path<String>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    C: ConfirmationRepository + 'static,
    M: Mailer + 'static,
    P: PostRepository + 'static,
    R: TradeRequestRepository + 'static,
{
    match state.auth_service.confirm_email(&token).await {
        Ok(user) => {
            info!(user_id = %user.id, "Email address confirmed");
            HttpResponse::Ok().json(ApiResponse::success(UserDto::from(user)))
        }
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for POST /api/v1/auth/resend-confirmation
///
/// Replaces any outstanding confirmation token for the address with a fresh
/// one and mails the new link.
pub async fn resend_confirmation<U, T, C, M, P, R>(
    state: web::Data<AppState<U, T, C, M, P, R>>,
    request: web::Json<ResendConfirmationRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    C: ConfirmationRepository + 'static,
    M: Mailer + 'static,
    P: PostRepository + 'static,
    R: TradeRequestRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    match state.auth_service.resend_confirmation(&request.email).await {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::success(MessageResponse::new(
            "Confirmation mail sent",
        ))),
        Err(error) => handle_domain_error(error),
    }
}
