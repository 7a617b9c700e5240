//! Token repository trait for refresh token persistence.
//!
//! Refresh tokens are stored hashed; the repository only ever sees the
//! SHA-256 digest of the opaque token handed to the client.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

mod mock;

pub use mock::MockTokenRepository;

/// Repository trait for refresh token persistence operations
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Persist a newly issued refresh token
    ///
    /// # Arguments
    /// * `token` - The RefreshToken entity to store
    ///
    /// # Returns
    /// * `Ok(RefreshToken)` - The stored token
    /// * `Err(DomainError)` - Persistence failed (e.g. duplicate hash)
    async fn save_refresh_token(&self, token: RefreshToken) -> Result<RefreshToken, DomainError>;

    /// Look up a refresh token by the hash of its opaque value
    ///
    /// # Arguments
    /// * `token_hash` - SHA-256 hex digest of the raw token
    ///
    /// # Returns
    /// * `Ok(Some(RefreshToken))` - Token found (may still be expired or revoked)
    /// * `Ok(None)` - Unknown token
    /// * `Err(DomainError)` - Database error occurred
    async fn find_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, DomainError>;

    /// Revoke a single refresh token
    ///
    /// # Returns
    /// * `Ok(true)` - Token was found and revoked
    /// * `Ok(false)` - Unknown token
    /// * `Err(DomainError)` - Database error occurred
    async fn revoke_token(&self, token_hash: &str) -> Result<bool, DomainError>;

    /// Revoke every token belonging to a user
    ///
    /// Used when an account is disabled so no session survives the account.
    ///
    /// # Returns
    /// * `Ok(count)` - Number of tokens revoked
    async fn revoke_all_user_tokens(&self, user_id: Uuid) -> Result<usize, DomainError>;

    /// Delete tokens whose expiry has passed
    ///
    /// # Returns
    /// * `Ok(count)` - Number of tokens removed
    async fn delete_expired_tokens(&self) -> Result<usize, DomainError>;
}
