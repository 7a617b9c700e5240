use actix_web::{web, HttpResponse};

use crate::dto::PostDto;
use crate::handlers::handle_domain_error;
use crate::routes::AppState;

use tn_core::repositories::{
    ConfirmationRepository, PostRepository, TokenRepository, TradeRequestRepository,
    UserRepository,
};
use tn_core::services::mail::Mailer;
use tn_shared::types::{ApiResponse, CursorPagination};

/// Handler for GET /api/v1/posts
///
/// Public feed, newest posts first. `?limit` caps the page size (1 to 50,
/// default 20); `?after=<post id>` continues from a previous page's
/// `next_cursor`.
pub async fn feed<U, T, C, M, P, R>(
    state: web::Data<AppState<U, T, C, M, P, R>>,
    query: web::Query<CursorPagination>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    C: ConfirmationRepository + 'static,
    M: Mailer + 'static,
    P: PostRepository + 'static,
    R: TradeRequestRepository + 'static,
{
    match state.post_service.feed(query.into_inner()).await {
        Ok(page) => HttpResponse::Ok().json(ApiResponse::success(page.map(PostDto::from))),
        Err(error) => handle_domain_error(error),
    }
}
