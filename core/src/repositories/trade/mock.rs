//! Mock implementation of TradeRequestRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::trade::{TradeRequest, TradeStatus};
use crate::errors::DomainError;

use super::TradeRequestRepository;

/// In-memory trade request repository for testing
pub struct MockTradeRequestRepository {
    requests: Arc<RwLock<HashMap<Uuid, TradeRequest>>>,
}

impl MockTradeRequestRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn newest_first(mut requests: Vec<TradeRequest>) -> Vec<TradeRequest> {
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        requests
    }
}

impl Default for MockTradeRequestRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TradeRequestRepository for MockTradeRequestRepository {
    async fn create(&self, request: TradeRequest) -> Result<TradeRequest, DomainError> {
        let mut requests = self.requests.write().await;
        requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TradeRequest>, DomainError> {
        let requests = self.requests.read().await;
        Ok(requests.get(&id).cloned())
    }

    async fn list_sent(&self, sender_id: Uuid) -> Result<Vec<TradeRequest>, DomainError> {
        let requests = self.requests.read().await;
        Ok(Self::newest_first(
            requests
                .values()
                .filter(|r| r.sender_id == sender_id)
                .cloned()
                .collect(),
        ))
    }

    async fn list_received(&self, receiver_id: Uuid) -> Result<Vec<TradeRequest>, DomainError> {
        let requests = self.requests.read().await;
        Ok(Self::newest_first(
            requests
                .values()
                .filter(|r| r.receiver_id == receiver_id)
                .cloned()
                .collect(),
        ))
    }

    async fn pending_exists(&self, post_id: Uuid, sender_id: Uuid) -> Result<bool, DomainError> {
        let requests = self.requests.read().await;
        Ok(requests.values().any(|r| {
            r.post_id == post_id && r.sender_id == sender_id && r.status == TradeStatus::Pending
        }))
    }

    async fn update_status(&self, id: Uuid, status: TradeStatus) -> Result<bool, DomainError> {
        let mut requests = self.requests.write().await;
        match requests.get_mut(&id) {
            Some(request) => {
                request.transition(status);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
