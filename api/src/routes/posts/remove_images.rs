use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::dto::{PostDto, RemoveImagesRequest};
use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;
use crate::routes::AppState;

use tn_core::repositories::{
    ConfirmationRepository, PostRepository, TokenRepository, TradeRequestRepository,
    UserRepository,
};
use tn_core::services::mail::Mailer;
use tn_core::services::post::PostChanges;
use tn_shared::types::ApiResponse;

/// Handler for DELETE /api/v1/posts/{id}/images
///
/// JSON body `{ "urls": [...] }` naming the images to detach. Owner only.
/// Urls that do not belong to the post are ignored. Files are unlinked
/// after the rows are gone.
pub async fn remove_images<U, T, C, M, P, R>(
    context: AuthContext,
    state: web::Data<AppState<U, T, C, M, P, R>>,
    id: web::Path<Uuid>,
    request: web::Json<RemoveImagesRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    C: ConfirmationRepository + 'static,
    M: Mailer + 'static,
    P: PostRepository + 'static,
    R: TradeRequestRepository + 'static,
{
    let changes = PostChanges {
        removed_image_urls: request.into_inner().urls,
        ..PostChanges::default()
    };

    match state
        .post_service
        .update_post(context.user_id, *id, changes)
        .await
    {
        Ok((post, removed)) => {
            state
                .uploads
                .remove_all(removed.iter().map(|image| image.file_path.as_str()))
                .await;
            HttpResponse::Ok().json(ApiResponse::success(PostDto::from(post)))
        }
        Err(error) => handle_domain_error(error),
    }
}
