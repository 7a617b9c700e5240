//! User entity representing a registered account in the TradeNest system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity representing a registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Unique login name
    pub username: String,

    /// Unique email address
    pub email: String,

    /// bcrypt hash of the password; never the password itself
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Optional contact phone
    pub phone: Option<String>,

    /// On-disk path of the current avatar file
    pub avatar_path: Option<String>,

    /// Public url of the current avatar
    pub avatar_url: Option<String>,

    /// Whether the email address has been confirmed
    pub is_active: bool,

    /// Whether the account has been soft-deleted
    pub is_disabled: bool,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,

    /// Timestamp of the user's last login
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a new, not yet confirmed user
    pub fn new(
        username: String,
        email: String,
        password_hash: String,
        first_name: String,
        last_name: String,
        phone: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            first_name,
            last_name,
            phone,
            avatar_path: None,
            avatar_url: None,
            is_active: false,
            is_disabled: false,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    /// Marks the email address as confirmed
    pub fn activate(&mut self) {
        self.is_active = true;
        self.updated_at = Utc::now();
    }

    /// Soft-deletes the account
    pub fn disable(&mut self) {
        self.is_disabled = true;
        self.updated_at = Utc::now();
    }

    /// Re-enables a soft-deleted account
    pub fn enable(&mut self) {
        self.is_disabled = false;
        self.updated_at = Utc::now();
    }

    /// Updates the last login timestamp
    pub fn record_login(&mut self) {
        self.last_login_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    /// Applies a profile edit, bumping `updated_at`
    pub fn apply_profile_changes(
        &mut self,
        first_name: Option<String>,
        last_name: Option<String>,
        phone: Option<String>,
    ) {
        if let Some(first_name) = first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = last_name {
            self.last_name = last_name;
        }
        if let Some(phone) = phone {
            self.phone = Some(phone);
        }
        self.updated_at = Utc::now();
    }

    /// Replaces the avatar file references
    pub fn set_avatar(&mut self, path: String, url: String) {
        self.avatar_path = Some(path);
        self.avatar_url = Some(url);
        self.updated_at = Utc::now();
    }

    /// A confirmed, non-disabled account may log in
    pub fn can_login(&self) -> bool {
        self.is_active && !self.is_disabled
    }

    /// Full name used in outbound mail and profile payloads
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
