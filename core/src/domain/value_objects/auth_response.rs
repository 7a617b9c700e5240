//! Authentication response value object for API responses.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::User;

/// Authentication response returned after a successful login or refresh
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    /// Authenticated user id
    pub user_id: Uuid,

    /// Login name of the authenticated user
    pub username: String,

    /// JWT access token for API authentication
    pub access_token: String,

    /// Opaque refresh token for obtaining new access tokens
    pub refresh_token: String,

    /// Access token expiration time in seconds
    pub expires_in: i64,
}

impl AuthResponse {
    /// Creates an authentication response from a token pair and the user
    pub fn from_token_pair(user: &User, token_pair: TokenPair) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            access_token: token_pair.access_token,
            refresh_token: token_pair.refresh_token,
            expires_in: token_pair.access_expires_in,
        }
    }
}
