//! Mock implementation of UserRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

use super::UserRepository;

/// In-memory user repository for testing
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MockUserRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Seed the repository with an existing user
    pub async fn insert(&self, user: User) {
        let mut users = self.users.write().await;
        users.insert(user.id, user);
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == user.username) {
            return Err(DomainError::Validation {
                message: "Username already registered".to_string(),
            });
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::Validation {
                message: "Email already registered".to_string(),
            });
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.username == username))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.email == email))
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(DomainError::NotFound {
                resource: "User".to_string(),
            });
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn activate(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut users = self.users.write().await;
        match users.get_mut(&id) {
            Some(user) => {
                user.activate();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn disable(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut users = self.users.write().await;
        match users.get_mut(&id) {
            Some(user) => {
                user.disable();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn record_login(&self, id: Uuid) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        if let Some(user) = users.get_mut(&id) {
            user.record_login();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(username: &str, email: &str) -> User {
        User::new(
            username.to_string(),
            email.to_string(),
            "$2b$12$hash".to_string(),
            "Maria".to_string(),
            "Soler".to_string(),
            None,
        )
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = MockUserRepository::new();
        let user = sample_user("maria_92", "maria@example.com");
        let id = user.id;

        repo.create(user).await.unwrap();

        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.username, "maria_92");

        let by_name = repo.find_by_username("maria_92").await.unwrap();
        assert!(by_name.is_some());

        let by_email = repo.find_by_email("maria@example.com").await.unwrap();
        assert!(by_email.is_some());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_username() {
        let repo = MockUserRepository::new();
        repo.create(sample_user("maria_92", "maria@example.com"))
            .await
            .unwrap();

        let result = repo
            .create(sample_user("maria_92", "other@example.com"))
            .await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let repo = MockUserRepository::new();
        repo.create(sample_user("maria_92", "maria@example.com"))
            .await
            .unwrap();

        let result = repo
            .create(sample_user("other_user", "maria@example.com"))
            .await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_activate_and_disable() {
        let repo = MockUserRepository::new();
        let user = sample_user("maria_92", "maria@example.com");
        let id = user.id;
        repo.create(user).await.unwrap();

        assert!(repo.activate(id).await.unwrap());
        let activated = repo.find_by_id(id).await.unwrap().unwrap();
        assert!(activated.is_active);

        assert!(repo.disable(id).await.unwrap());
        let disabled = repo.find_by_id(id).await.unwrap().unwrap();
        assert!(disabled.is_disabled);

        assert!(!repo.activate(Uuid::new_v4()).await.unwrap());
        assert!(!repo.disable(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_checks() {
        let repo = MockUserRepository::new();
        repo.create(sample_user("maria_92", "maria@example.com"))
            .await
            .unwrap();

        assert!(repo.username_exists("maria_92").await.unwrap());
        assert!(!repo.username_exists("nobody").await.unwrap());
        assert!(repo.email_exists("maria@example.com").await.unwrap());
        assert!(!repo.email_exists("nobody@example.com").await.unwrap());
    }
}
