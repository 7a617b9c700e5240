use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use tn_core::domain::value_objects::AuthResponse;

/// Body for `POST /auth/register`
///
/// Field limits mirror the domain rules so obviously broken input is
/// rejected before it reaches the service.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 30))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 72))]
    pub password: String,

    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    pub phone: Option<String>,
}

/// Body for `POST /auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body for `POST /auth/refresh`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Body for `POST /auth/logout`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

/// Body for `POST /auth/resend-confirmation`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResendConfirmationRequest {
    #[validate(email)]
    pub email: String,
}

/// The user half of a session response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub username: String,
}

/// The token half of a session response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokensDto {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Response for login and refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user: SessionUser,
    pub tokens: TokensDto,
}

impl From<AuthResponse> for SessionResponse {
    fn from(auth: AuthResponse) -> Self {
        Self {
            user: SessionUser {
                id: auth.user_id,
                username: auth.username,
            },
            tokens: TokensDto {
                access_token: auth.access_token,
                refresh_token: auth.refresh_token,
                expires_in: auth.expires_in,
            },
        }
    }
}

/// Response for the availability probes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub available: bool,
}

/// Response for endpoints that only acknowledge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
