use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::dto::PostDto;
use crate::handlers::handle_domain_error;
use crate::routes::AppState;

use tn_core::repositories::{
    ConfirmationRepository, PostRepository, TokenRepository, TradeRequestRepository,
    UserRepository,
};
use tn_core::services::mail::Mailer;
use tn_shared::types::ApiResponse;

/// Handler for GET /api/v1/posts/{id}
pub async fn post_detail<U, T, C, M, P, R>(
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
    match state.post_service.post_detail(*id).await {
        Ok(post) => HttpResponse::Ok().json(ApiResponse::success(PostDto::from(post))),
        Err(error) => handle_domain_error(error),
    }
}
