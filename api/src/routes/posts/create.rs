use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use tracing::info;

use crate::dto::PostDto;
use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;
use crate::routes::posts::form::collect_post_form;
use crate::routes::AppState;

use tn_core::repositories::{
    ConfirmationRepository, PostRepository, TokenRepository, TradeRequestRepository,
    UserRepository,
};
use tn_core::services::mail::Mailer;
use tn_core::services::post::NewPost;
use tn_shared::types::ApiResponse;

/// Handler for POST /api/v1/posts
///
/// Multipart form: `title`, `description`, optional `latitude` +
/// `longitude`, and up to the configured number of image parts named
/// `images`. Files are stored first; if the post itself cannot be
/// persisted the files are unlinked again, so no orphan files survive a
/// failed request.
///
/// # Responses
///
/// - 201 Created: the stored post with its image urls
/// - 400 Bad Request: missing or invalid fields, or a non-image file part
/// - 409 Conflict: too many images
/// - 413 Payload Too Large: one file exceeded the size limit
pub async fn create_post<U, T, C, M, P, R>(
    context: AuthContext,
    state: web::Data<AppState<U, T, C, M, P, R>>,
    mut payload: Multipart,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    C: ConfirmationRepository + 'static,
    M: Mailer + 'static,
    P: PostRepository + 'static,
    R: TradeRequestRepository + 'static,
{
    let form = match collect_post_form(&mut payload, &state.uploads).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    let location = match form.location() {
        Ok(location) => location,
        Err(error) => {
            form.discard(&state.uploads).await;
            return handle_domain_error(error);
        }
    };

    let file_paths = form.file_paths();
    let new_post = NewPost {
        title: form.title.clone().unwrap_or_default(),
        description: form.description.clone().unwrap_or_default(),
        location,
        images: form.new_images(),
    };

    match state.post_service.create_post(context.user_id, new_post).await {
        Ok(post) => {
            info!(
                post_id = %post.post.id,
                user_id = %context.user_id,
                images = post.images.len(),
                "Post published"
            );
            HttpResponse::Created().json(ApiResponse::success(PostDto::from(post)))
        }
        Err(error) => {
            state.uploads.remove_all(&file_paths).await;
            handle_domain_error(error)
        }
    }
}
