use actix_web::{web, HttpResponse};
use tracing::info;
use validator::Validate;

use crate::dto::{RegisterRequest, UserDto};
use crate::handlers::{handle_domain_error, handle_validation_errors};
use crate::routes::AppState;

use tn_core::repositories::{
    ConfirmationRepository, PostRepository, TokenRepository, TradeRequestRepository,
    UserRepository,
};
use tn_core::services::auth::Registration;
use tn_core::services::mail::Mailer;
use tn_shared::types::ApiResponse;

/// Handler for POST /api/v1/auth/register
///
/// Creates an account and mails a confirmation link. The account stays
/// inactive until the link is followed.
///
/// # Request Body
///
/// ```json
/// {
///     "username": "maria_92",
///     "email": "maria@example.com",
///     "password": "correct horse battery",
///     "first_name": "Maria",
///     "last_name": "Soler",
///     "phone": "+34600111222"
/// }
/// ```
///
/// # Responses
///
/// - 201 Created: the stored user (inactive)
/// - 400 Bad Request: field validation failed
/// - 409 Conflict: username or email already taken
pub async fn register<U, T, C, M, P, R>(
    state: web::Data<AppState<U, T, C, M, P, R>>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    C: ConfirmationRepository + 'static,
    M: Mailer + 'static,
    P: PostRepository + 'static,
    R: TradeRequestRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    let request = request.into_inner();
    let registration = Registration {
        username: request.username,
        email: request.email,
        password: request.password,
        first_name: request.first_name,
        last_name: request.last_name,
        phone: request.phone,
    };

    match state.auth_service.register(registration).await {
        Ok(user) => {
            info!(user_id = %user.id, username = %user.username, "Account registered");
            HttpResponse::Created().json(ApiResponse::success(UserDto::from(user)))
        }
        Err(error) => handle_domain_error(error),
    }
}
