//! User repository trait defining the interface for account persistence.
//!
//! This module defines the repository pattern interface for User entities.
//! The trait is async-first and uses Result types for proper error handling;
//! implementations live in the infrastructure layer.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

mod mock;

pub use mock::MockUserRepository;

/// Repository trait for User entity persistence operations
///
/// This trait defines the contract for data access operations related to
/// accounts. Implementations handle the actual database operations while
/// maintaining the abstraction boundary between domain and infrastructure.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user in the repository
    ///
    /// # Arguments
    /// * `user` - The User entity to persist
    ///
    /// # Returns
    /// * `Ok(User)` - The created user
    /// * `Err(DomainError)` - Creation failed (e.g. duplicate username or email)
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Find a user by their unique identifier
    ///
    /// # Arguments
    /// * `id` - The UUID of the user
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user found with given ID
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by their login name
    ///
    /// # Arguments
    /// * `username` - The unique login name
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user found with given username
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by their email address
    ///
    /// # Arguments
    /// * `email` - The unique email address
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user found with given email
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Check whether a username is already registered
    ///
    /// # Returns
    /// * `Ok(true)` - Username is taken
    /// * `Ok(false)` - Username is free
    /// * `Err(DomainError)` - Database error occurred
    async fn username_exists(&self, username: &str) -> Result<bool, DomainError>;

    /// Check whether an email address is already registered
    ///
    /// # Returns
    /// * `Ok(true)` - Email is taken
    /// * `Ok(false)` - Email is free
    /// * `Err(DomainError)` - Database error occurred
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError>;

    /// Update an existing user in the repository
    ///
    /// # Arguments
    /// * `user` - The User entity with updated fields
    ///
    /// # Returns
    /// * `Ok(User)` - The updated user
    /// * `Err(DomainError)` - Update failed (e.g. user not found)
    async fn update(&self, user: User) -> Result<User, DomainError>;

    /// Mark a user's email address as confirmed
    ///
    /// # Arguments
    /// * `id` - The UUID of the user to activate
    ///
    /// # Returns
    /// * `Ok(true)` - User was activated
    /// * `Ok(false)` - User not found
    /// * `Err(DomainError)` - Database error occurred
    async fn activate(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Soft-delete a user account
    ///
    /// The row is kept so that existing posts and trade requests remain
    /// attributable; the account simply can no longer log in.
    ///
    /// # Arguments
    /// * `id` - The UUID of the user to disable
    ///
    /// # Returns
    /// * `Ok(true)` - User was disabled
    /// * `Ok(false)` - User not found
    /// * `Err(DomainError)` - Database error occurred
    async fn disable(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Record a successful login for a user
    ///
    /// # Arguments
    /// * `id` - The UUID of the user who logged in
    async fn record_login(&self, id: Uuid) -> Result<(), DomainError>;
}
