//! Single-use email confirmation tokens issued at registration.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Email confirmation token expiration time (24 hours)
pub const CONFIRMATION_TOKEN_EXPIRY_HOURS: i64 = 24;

/// Length of the raw confirmation token emailed to the user
pub const CONFIRMATION_TOKEN_LENGTH: usize = 48;

/// Email confirmation token stored in the database
///
/// Only the SHA-256 digest of the raw token is persisted; the raw value lives
/// solely inside the confirmation link sent by mail. Consuming the token
/// deletes the row, which is what makes it single use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailConfirmation {
    /// Unique identifier for the confirmation
    pub id: Uuid,

    /// User awaiting confirmation
    pub user_id: Uuid,

    /// Hashed token value
    pub token_hash: String,

    /// Timestamp when the confirmation was issued
    pub created_at: DateTime<Utc>,

    /// Timestamp when the confirmation expires
    pub expires_at: DateTime<Utc>,
}

impl EmailConfirmation {
    /// Creates a new confirmation for a user
    pub fn new(user_id: Uuid, token_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            created_at: now,
            expires_at: now + Duration::hours(CONFIRMATION_TOKEN_EXPIRY_HOURS),
        }
    }

    /// Creates a confirmation with a custom time to live in seconds
    pub fn with_ttl(user_id: Uuid, token_hash: String, ttl_seconds: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            created_at: now,
            expires_at: now + Duration::seconds(ttl_seconds),
        }
    }

    /// Checks if the confirmation has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_confirmation_is_usable() {
        let confirmation = EmailConfirmation::new(Uuid::new_v4(), "digest".to_string());
        assert!(!confirmation.is_expired());

        let remaining = confirmation.expires_at - confirmation.created_at;
        assert_eq!(remaining, Duration::hours(CONFIRMATION_TOKEN_EXPIRY_HOURS));
    }

    #[test]
    fn test_expired_confirmation() {
        let mut confirmation = EmailConfirmation::new(Uuid::new_v4(), "digest".to_string());
        confirmation.expires_at = Utc::now() - Duration::minutes(1);
        assert!(confirmation.is_expired());
    }

    #[test]
    fn test_custom_ttl() {
        let confirmation = EmailConfirmation::with_ttl(Uuid::new_v4(), "digest".to_string(), 60);
        let remaining = confirmation.expires_at - confirmation.created_at;
        assert_eq!(remaining, Duration::seconds(60));
    }
}
