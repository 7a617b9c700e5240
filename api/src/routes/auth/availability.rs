use actix_web::{web, HttpResponse};

use crate::dto::AvailabilityResponse;
use crate::handlers::handle_domain_error;
use crate::routes::AppState;

use tn_core::repositories::{
    ConfirmationRepository, PostRepository, TokenRepository, TradeRequestRepository,
    UserRepository,
};
use tn_core::services::mail::Mailer;

/// Handler for GET /api/v1/auth/username/{username}
///
/// Availability probe used by signup forms. Answers `{ "available": true }`
/// with 200, or `{ "available": false }` with 409 when the name is taken.
pub async fn username_available<U, T, C, M, P, R>(
    state: web::Data<AppState<U, T, C, M, P, R>>,
    username: web::Path<String>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    C: ConfirmationRepository + 'static,
    M: Mailer + 'static,
    P: PostRepository + 'static,
    R: TradeRequestRepository + 'static,
{
    match state.auth_service.is_username_available(&username).await {
        Ok(available) => availability_response(available),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for GET /api/v1/auth/email/{email}
pub async fn email_available<U, T, C, M, P, R>(
    state: web::Data<AppState<U, T, C, M, P, R>>,
    email: web::Path<String>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    C: ConfirmationRepository + 'static,
    M: Mailer + 'static,
    P: PostRepository + 'static,
    R: TradeRequestRepository + 'static,
{
    match state.auth_service.is_email_available(&email).await {
        Ok(available) => availability_response(available),
        Err(error) => handle_domain_error(error),
    }
}

fn availability_response(available: bool) -> HttpResponse {
    let body = AvailabilityResponse { available };
    if available {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::Conflict().json(body)
    }
}
