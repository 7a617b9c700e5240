//! Trade request repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::trade::{TradeRequest, TradeStatus};
use crate::errors::DomainError;

mod mock;

pub use mock::MockTradeRequestRepository;

/// Repository trait for trade request persistence operations
#[async_trait]
pub trait TradeRequestRepository: Send + Sync {
    /// Persist a new trade request
    async fn create(&self, request: TradeRequest) -> Result<TradeRequest, DomainError>;

    /// Find a trade request by its unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<TradeRequest>, DomainError>;

    /// Requests a user has sent, newest first
    async fn list_sent(&self, sender_id: Uuid) -> Result<Vec<TradeRequest>, DomainError>;

    /// Requests aimed at a user's posts, newest first
    async fn list_received(&self, receiver_id: Uuid) -> Result<Vec<TradeRequest>, DomainError>;

    /// Whether a pending request from this sender already targets this post
    ///
    /// Keeps a sender from stacking duplicate offers on a post while the
    /// first one is still unanswered.
    async fn pending_exists(&self, post_id: Uuid, sender_id: Uuid) -> Result<bool, DomainError>;

    /// Move a request into a new status
    ///
    /// # Returns
    /// * `Ok(true)` - Request was found and updated
    /// * `Ok(false)` - Request not found
    async fn update_status(&self, id: Uuid, status: TradeStatus) -> Result<bool, DomainError>;
}
