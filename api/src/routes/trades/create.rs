use actix_web::{web, HttpResponse};
use tracing::info;

use crate::dto::{CreateTradeRequest, TradeRequestDto};
use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;
use crate::routes::AppState;

use tn_core::repositories::{
    ConfirmationRepository, PostRepository, TokenRepository, TradeRequestRepository,
    UserRepository,
};
use tn_core::services::mail::Mailer;
use tn_core::services::trade::NewTradeRequest;
use tn_shared::types::ApiResponse;

/// Handler for POST /api/v1/trades
///
/// Opens a trade request aimed at a post. The receiver is the post owner.
///
/// # Responses
///
/// - 201 Created: the pending request
/// - 400 Bad Request: message too long
/// - 404 Not Found: target or offered post does not exist
/// - 409 Conflict: own post, offered post not owned by the sender, or a
///   pending request for this post already exists
pub async fn create_trade<U, T, C, M, P, R>(
    context: AuthContext,
    state: web::Data<AppState<U, T, C, M, P, R>>,
    request: web::Json<CreateTradeRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    C: ConfirmationRepository + 'static,
    M: Mailer + 'static,
    P: PostRepository + 'static,
    R: TradeRequestRepository + 'static,
{
    let request = request.into_inner();
    let new_request = NewTradeRequest {
        post_id: request.post_id,
        offered_post_id: request.offered_post_id,
        message: request.message,
    };

    match state
        .trade_service
        .create_request(context.user_id, new_request)
        .await
    {
        Ok(trade) => {
            info!(
                trade_id = %trade.id,
                post_id = %trade.post_id,
                sender_id = %trade.sender_id,
                "Trade request opened"
            );
            HttpResponse::Created().json(ApiResponse::success(TradeRequestDto::from(trade)))
        }
        Err(error) => handle_domain_error(error),
    }
}
