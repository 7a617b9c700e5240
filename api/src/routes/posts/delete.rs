use actix_web::{web, HttpResponse};
use tracing::info;
use uuid::Uuid;

use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;
use crate::routes::AppState;

use tn_core::repositories::{
    ConfirmationRepository, PostRepository, TokenRepository, TradeRequestRepository,
    UserRepository,
};
use tn_core::services::mail::Mailer;

/// Handler for DELETE /api/v1/posts/{id}
///
/// Owner only. Image rows go with the post; the files are unlinked once
/// the rows are gone.
pub async fn delete_post<U, T, C, M, P, R>(
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
    match state.post_service.delete_post(context.user_id, *id).await {
        Ok(images) => {
            state
                .uploads
                .remove_all(images.iter().map(|image| image.file_path.as_str()))
                .await;
            info!(post_id = %id, user_id = %context.user_id, "Post deleted");
            HttpResponse::NoContent().finish()
        }
        Err(error) => handle_domain_error(error),
    }
}
