//! Password hashing built on bcrypt.

use crate::errors::{AuthError, DomainError};

/// Default bcrypt cost factor
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Hashes and verifies passwords with bcrypt
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a hasher with an explicit cost factor
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plain text password
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The bcrypt hash, safe to persist
    /// * `Err(DomainError)` - Hashing failed
    pub fn hash(&self, password: &str) -> Result<String, DomainError> {
        bcrypt::hash(password, self.cost).map_err(|e| DomainError::Internal {
            message: format!("Failed to hash password: {}", e),
        })
    }

    /// Verify a plain text password against a stored hash
    ///
    /// A malformed stored hash reads as invalid credentials rather than an
    /// internal error, so a corrupted row cannot be told apart from a wrong
    /// password by the caller.
    pub fn verify(&self, password: &str, hash: &str) -> Result<(), DomainError> {
        match bcrypt::verify(password, hash) {
            Ok(true) => Ok(()),
            _ => Err(DomainError::Auth(AuthError::InvalidCredentials)),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}
