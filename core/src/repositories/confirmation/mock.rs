//! Mock implementation of ConfirmationRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::confirmation::EmailConfirmation;
use crate::errors::DomainError;

use super::ConfirmationRepository;

/// In-memory confirmation repository for testing
pub struct MockConfirmationRepository {
    confirmations: Arc<RwLock<HashMap<String, EmailConfirmation>>>,
}

impl MockConfirmationRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            confirmations: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored confirmations
    pub async fn len(&self) -> usize {
        self.confirmations.read().await.len()
    }

    /// True when no confirmations are stored
    pub async fn is_empty(&self) -> bool {
        self.confirmations.read().await.is_empty()
    }
}

impl Default for MockConfirmationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfirmationRepository for MockConfirmationRepository {
    async fn save(
        &self,
        confirmation: EmailConfirmation,
    ) -> Result<EmailConfirmation, DomainError> {
        let mut confirmations = self.confirmations.write().await;
        confirmations.insert(confirmation.token_hash.clone(), confirmation.clone());
        Ok(confirmation)
    }

    async fn consume(&self, token_hash: &str) -> Result<Option<EmailConfirmation>, DomainError> {
        let mut confirmations = self.confirmations.write().await;
        Ok(confirmations.remove(token_hash))
    }

    async fn delete_for_user(&self, user_id: Uuid) -> Result<u64, DomainError> {
        let mut confirmations = self.confirmations.write().await;
        let initial = confirmations.len();
        confirmations.retain(|_, c| c.user_id != user_id);
        Ok((initial - confirmations.len()) as u64)
    }

    async fn delete_expired(&self) -> Result<u64, DomainError> {
        let mut confirmations = self.confirmations.write().await;
        let initial = confirmations.len();
        confirmations.retain(|_, c| !c.is_expired());
        Ok((initial - confirmations.len()) as u64)
    }
}
