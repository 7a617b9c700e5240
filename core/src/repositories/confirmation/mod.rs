//! Confirmation repository trait for single-use email confirmation tokens.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::confirmation::EmailConfirmation;
use crate::errors::DomainError;

mod mock;

pub use mock::MockConfirmationRepository;

/// Repository trait for email confirmation token persistence
#[async_trait]
pub trait ConfirmationRepository: Send + Sync {
    /// Persist a freshly issued confirmation token
    async fn save(
        &self,
        confirmation: EmailConfirmation,
    ) -> Result<EmailConfirmation, DomainError>;

    /// Atomically claim a confirmation token by its hash
    ///
    /// The matching row is deleted and returned in one step so that two
    /// concurrent requests cannot both confirm with the same token. Expiry
    /// is not checked here; the caller decides what an expired claim means.
    ///
    /// # Returns
    /// * `Ok(Some(EmailConfirmation))` - Token existed and is now consumed
    /// * `Ok(None)` - Unknown token
    async fn consume(&self, token_hash: &str) -> Result<Option<EmailConfirmation>, DomainError>;

    /// Delete all outstanding confirmations for a user
    ///
    /// Used when a fresh confirmation mail is sent, or when sending failed
    /// and the token must not stay claimable.
    ///
    /// # Returns
    /// * `Ok(count)` - Number of rows removed
    async fn delete_for_user(&self, user_id: Uuid) -> Result<u64, DomainError>;

    /// Delete confirmations whose expiry has passed
    ///
    /// # Returns
    /// * `Ok(count)` - Number of rows removed
    async fn delete_expired(&self) -> Result<u64, DomainError>;
}
