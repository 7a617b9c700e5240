//! Profile management for authenticated users.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::repositories::{TokenRepository, UserRepository};
use crate::services::token::TokenService;

use tn_shared::utils::validation::validators;

/// A freshly stored avatar file
#[derive(Debug, Clone)]
pub struct AvatarUpload {
    /// On-disk path of the stored file
    pub file_path: String,
    /// Public url of the stored file
    pub url: String,
}

/// Profile fields a user may edit about themselves
///
/// Unset fields are left as they are.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<AvatarUpload>,
}

/// Service for reading and editing user profiles
pub struct UserService<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    user_repository: Arc<U>,
    token_service: Arc<TokenService<T>>,
}

impl<U, T> UserService<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    /// Create a new user service
    pub fn new(user_repository: Arc<U>, token_service: Arc<TokenService<T>>) -> Self {
        Self {
            user_repository,
            token_service,
        }
    }

    /// Load a user's own profile
    ///
    /// A disabled account reads as gone, even while an access token issued
    /// before the disable is still live.
    pub async fn profile(&self, user_id: Uuid) -> DomainResult<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .filter(|user| !user.is_disabled)
            .ok_or_else(|| DomainError::not_found("User"))
    }

    /// Apply a profile edit
    ///
    /// When a new avatar comes in, the previous avatar's file path is
    /// returned so the caller can unlink the file after the row is safely
    /// updated.
    ///
    /// # Returns
    ///
    /// * `Ok((User, Option<String>))` - Updated user and the replaced avatar path
    /// * `Err(DomainError)` - User missing or a field failed validation
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        changes: ProfileChanges,
    ) -> DomainResult<(User, Option<String>)> {
        validate_changes(&changes)?;

        let mut user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .filter(|user| !user.is_disabled)
            .ok_or_else(|| DomainError::not_found("User"))?;

        user.apply_profile_changes(
            changes.first_name.map(|v| v.trim().to_string()),
            changes.last_name.map(|v| v.trim().to_string()),
            changes.phone.map(|v| v.trim().to_string()),
        );

        let replaced_avatar_path = match changes.avatar {
            Some(avatar) => {
                let old = user.avatar_path.clone();
                user.set_avatar(avatar.file_path, avatar.url);
                old
            }
            None => None,
        };

        let user = self.user_repository.update(user).await?;
        Ok((user, replaced_avatar_path))
    }

    /// Disable the account and end every session
    ///
    /// The user row stays; posts and trade requests keep their author. All
    /// refresh tokens are revoked so no session outlives the account.
    pub async fn disable_account(&self, user_id: Uuid) -> DomainResult<()> {
        let disabled = self.user_repository.disable(user_id).await?;
        if !disabled {
            return Err(DomainError::not_found("User"));
        }

        let revoked = self.token_service.revoke_all_tokens(user_id).await?;
        info!(user_id = %user_id, revoked_sessions = revoked, "account disabled");

        Ok(())
    }
}

fn validate_changes(changes: &ProfileChanges) -> DomainResult<()> {
    for (field, value) in [
        ("first_name", &changes.first_name),
        ("last_name", &changes.last_name),
    ] {
        if let Some(value) = value {
            let value = value.trim();
            if !validators::not_empty(value) || !validators::length_between(value, 1, 100) {
                return Err(DomainError::ValidationErr(ValidationError::OutOfRange {
                    field: field.to_string(),
                    min: "1".to_string(),
                    max: "100".to_string(),
                }));
            }
        }
    }
    if let Some(phone) = &changes.phone {
        if !validators::is_valid_phone(phone.trim()) {
            return Err(DomainError::ValidationErr(ValidationError::PatternMismatch {
                field: "phone".to_string(),
            }));
        }
    }
    Ok(())
}
