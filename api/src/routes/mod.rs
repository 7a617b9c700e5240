//! HTTP route handlers, grouped by resource.

pub mod auth;
pub mod posts;
pub mod trades;
pub mod users;

use std::sync::Arc;

use tn_core::repositories::{
    ConfirmationRepository, PostRepository, TokenRepository, TradeRequestRepository,
    UserRepository,
};
use tn_core::services::auth::AuthService;
use tn_core::services::mail::Mailer;
use tn_core::services::post::PostService;
use tn_core::services::trade::TradeService;
use tn_core::services::user::UserService;

use crate::uploads::UploadStore;

/// Shared services handed to every handler
///
/// Generic over the repository and mailer implementations so the
/// integration tests can run the full HTTP stack against in-memory mocks.
pub struct AppState<U, T, C, M, P, R>
where
    U: UserRepository,
    T: TokenRepository,
    C: ConfirmationRepository,
    M: Mailer,
    P: PostRepository,
    R: TradeRequestRepository,
{
    pub auth_service: Arc<AuthService<U, T, C, M>>,
    pub user_service: Arc<UserService<U, T>>,
    pub post_service: Arc<PostService<P>>,
    pub trade_service: Arc<TradeService<R, P>>,
    pub uploads: UploadStore,
}
