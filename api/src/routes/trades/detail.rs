use actix_web::{web, HttpResponse};
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
use tn_shared::types::ApiResponse;

/// Handler for GET /api/v1/trades/{id}
///
/// Only the sender and the receiver may see a request; everyone else gets
/// a 403.
pub async fn trade_detail<U, T, C, M, P, R>(
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
    match state.trade_service.request_detail(context.user_id, *id).await {
        Ok(trade) => HttpResponse::Ok().json(ApiResponse::success(TradeRequestDto::from(trade))),
        Err(error) => handle_domain_error(error),
    }
}
