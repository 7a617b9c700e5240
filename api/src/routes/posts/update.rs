use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

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
use tn_core::services::post::PostChanges;
use tn_shared::types::ApiResponse;

/// Handler for PUT /api/v1/posts/{id}
///
/// Multipart form with the same fields as post creation; text parts that
/// are absent leave the stored value untouched, image parts are appended.
/// Owner only.
pub async fn update_post<U, T, C, M, P, R>(
    context: AuthContext,
    state: web::Data<AppState<U, T, C, M, P, R>>,
    id: web::Path<Uuid>,
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
    let changes = PostChanges {
        title: form.title.clone(),
        description: form.description.clone(),
        location,
        new_images: form.new_images(),
        removed_image_urls: Vec::new(),
    };

    match state
        .post_service
        .update_post(context.user_id, *id, changes)
        .await
    {
        Ok((post, _)) => HttpResponse::Ok().json(ApiResponse::success(PostDto::from(post))),
        Err(error) => {
            state.uploads.remove_all(&file_paths).await;
            handle_domain_error(error)
        }
    }
}
