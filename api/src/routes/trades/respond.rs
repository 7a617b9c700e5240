use actix_web::{web, HttpResponse};
use tracing::info;
use uuid::Uuid;

use crate::dto::TradeRequestDto;
use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;
use crate::routes::AppState;

use tn_core::repositories::{
    ConfirmationRepository, PostRepository, TokenRepository, TradeRequestRepository,
    UserRepository,
};
use tn_core::services::mail::Mailer;
use tn_core::services::trade::TradeDecision;
use tn_shared::types::ApiResponse;

/// Handler for POST /api/v1/trades/{id}/accept
///
/// Receiver only, pending requests only.
pub async fn accept_trade<U, T, C, M, P, R>(
    context: AuthContext,
    state: web::Data<AppState<U, T, C, M, P, R>>,
    id: web::Path<Uuid>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    C: ConfirmationRepository + 'static,
    M: Mailer + 'static,
    P: PostRepository + 'static,
    R: TradeRequestRepository + 'static,
{
    respond(context, state, *id, TradeDecision::Accept).await
}

/// Handler for POST /api/v1/trades/{id}/decline
///
/// Receiver only, pending requests only.
pub async fn decline_trade<U, T, C, M, P, R>(
    context: AuthContext,
    state: web::Data<AppState<U, T, C, M, P, R>>,
    id: web::Path<Uuid>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    C: ConfirmationRepository + 'static,
    M: Mailer + 'static,
    P: PostRepository + 'static,
    R: TradeRequestRepository + 'static,
{
    respond(context, state, *id, TradeDecision::Decline).await
}

/// Handler for POST /api/v1/trades/{id}/cancel
///
/// Sender only, pending requests only.
pub async fn cancel_trade<U, T, C, M, P, R>(
    context: AuthContext,
    state: web::Data<AppState<U, T, C, M, P, R>>,
    id: web::Path<Uuid>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    C: ConfirmationRepository + 'static,
    M: Mailer + 'static,
    P: PostRepository + 'static,
    R: TradeRequestRepository + 'static,
{
    respond(context, state, *id, TradeDecision::Cancel).await
}

async fn respond<U, T, C, M, P, R>(
    context: AuthContext,
    state: web::Data<AppState<U, T, C, M, P, R>>,
    id: Uuid,
    decision: TradeDecision,
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
        .trade_service
        .respond(context.user_id, id, decision)
        .await
    {
        Ok(trade) => {
            info!(trade_id = %trade.id, status = %trade.status, "Trade request answered");
            HttpResponse::Ok().json(ApiResponse::success(TradeRequestDto::from(trade)))
        }
        Err(error) => handle_domain_error(error),
    }
}
