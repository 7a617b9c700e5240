use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;

use crate::dto::UserDto;
use crate::handlers::{handle_domain_error, handle_upload_error};
use crate::middleware::AuthContext;
use crate::routes::AppState;
use crate::uploads::{read_text_field, StoredFile, UploadError, UploadStore};

use tn_core::repositories::{
    ConfirmationRepository, PostRepository, TokenRepository, TradeRequestRepository,
    UserRepository,
};
use tn_core::services::mail::Mailer;
use tn_core::services::user::{AvatarUpload, ProfileChanges};
use tn_shared::types::ApiResponse;

/// Handler for PUT /api/v1/users/me
///
/// Multipart form: optional text parts `first_name`, `last_name`, `phone`
/// and an optional image part `avatar`. The avatar file is written to disk
/// before the row update; if the update then fails, the fresh file is
/// unlinked. The previous avatar file is unlinked only after the update
/// committed.
pub async fn update_profile<U, T, C, M, P, R>(
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
    let mut changes = ProfileChanges::default();
    let mut saved_avatar: Option<StoredFile> = None;

    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(field) => field,
            Err(source) => {
                discard_saved(&state.uploads, &saved_avatar).await;
                return handle_upload_error(UploadError::Stream(source.to_string()));
            }
        };

        let name = field
            .content_disposition()
            .get_name()
            .unwrap_or_default()
            .to_string();

        let result = match name.as_str() {
            "first_name" => read_text_field(&mut field)
                .await
                .map(|value| changes.first_name = Some(value)),
            "last_name" => read_text_field(&mut field)
                .await
                .map(|value| changes.last_name = Some(value)),
            "phone" => read_text_field(&mut field)
                .await
                .map(|value| changes.phone = Some(value)),
            "avatar" => match state.uploads.save_field(&mut field).await {
                Ok(stored) => {
                    // A repeated avatar part replaces the first one
                    if let Some(previous) = saved_avatar.replace(stored) {
                        state.uploads.remove(&previous.file_path).await;
                    }
                    Ok(())
                }
                Err(error) => Err(error),
            },
            // Unknown parts are drained and dropped by the multipart stream
            _ => Ok(()),
        };

        if let Err(error) = result {
            discard_saved(&state.uploads, &saved_avatar).await;
            return handle_upload_error(error);
        }
    }

    changes.avatar = saved_avatar.as_ref().map(|stored| AvatarUpload {
        file_path: stored.file_path.clone(),
        url: stored.url.clone(),
    });

    match state
        .user_service
        .update_profile(context.user_id, changes)
        .await
    {
        Ok((user, replaced_avatar_path)) => {
            if let Some(path) = replaced_avatar_path {
                state.uploads.remove(&path).await;
            }
            HttpResponse::Ok().json(ApiResponse::success(UserDto::from(user)))
        }
        Err(error) => {
            discard_saved(&state.uploads, &saved_avatar).await;
            handle_domain_error(error)
        }
    }
}

async fn discard_saved(uploads: &UploadStore, saved: &Option<StoredFile>) {
    if let Some(stored) = saved {
        uploads.remove(&stored.file_path).await;
    }
}
