use actix_web::{web, HttpResponse};

use crate::dto::TradeRequestDto;
use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;
use crate::routes::AppState;

use tn_core::repositories::{
    ConfirmationRepository, PostRepository, TokenRepository, TradeRequestRepository,
    UserRepository,
};
use tn_core::services::mail::Mailer;
use tn_shared::types::ApiResponse;

/// Handler for GET /api/v1/trades/sent
pub async fn sent_trades<U, T, C, M, P, R>(
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
    match state.trade_service.sent_requests(context.user_id).await {
        Ok(trades) => HttpResponse::Ok().json(ApiResponse::success(
            trades
                .into_iter()
                .map(TradeRequestDto::from)
                .collect::<Vec<_>>(),
        )),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for GET /api/v1/trades/received
pub async fn received_trades<U, T, C, M, P, R>(
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
    match state.trade_service.received_requests(context.user_id).await {
        Ok(trades) => HttpResponse::Ok().json(ApiResponse::success(
            trades
                .into_iter()
                .map(TradeRequestDto::from)
                .collect::<Vec<_>>(),
        )),
        Err(error) => handle_domain_error(error),
    }
}
