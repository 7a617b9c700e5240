//! Trade request lifecycle: opening, answering, cancelling.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::trade::{TradeRequest, TradeStatus};
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::{PostRepository, TradeRequestRepository};

/// Longest accepted message on a trade request
const MAX_MESSAGE_CHARS: usize = 500;

/// Data for opening a trade request
#[derive(Debug, Clone)]
pub struct NewTradeRequest {
    /// The post the sender wants
    pub post_id: Uuid,
    /// Post offered in exchange, if any
    pub offered_post_id: Option<Uuid>,
    /// Free-form message to the receiver
    pub message: Option<String>,
}

/// What a user wants to do with a pending trade request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeDecision {
    /// Receiver accepts the exchange
    Accept,
    /// Receiver declines the exchange
    Decline,
    /// Sender withdraws the request
    Cancel,
}

impl TradeDecision {
    /// The status this decision moves the request into
    pub fn target_status(&self) -> TradeStatus {
        match self {
            TradeDecision::Accept => TradeStatus::Accepted,
            TradeDecision::Decline => TradeStatus::Declined,
            TradeDecision::Cancel => TradeStatus::Cancelled,
        }
    }
}

/// Service for managing trade requests between users
pub struct TradeService<R, P>
where
    R: TradeRequestRepository,
    P: PostRepository,
{
    trade_repository: Arc<R>,
    post_repository: Arc<P>,
}

impl<R, P> TradeService<R, P>
where
    R: TradeRequestRepository,
    P: PostRepository,
{
    /// Create a new trade service
    pub fn new(trade_repository: Arc<R>, post_repository: Arc<P>) -> Self {
        Self {
            trade_repository,
            post_repository,
        }
    }

    /// Open a trade request aimed at a post
    ///
    /// This method:
    /// 1. Resolves the requested post; its owner becomes the receiver
    /// 2. Refuses requests aimed at the sender's own post
    /// 3. Resolves the offered post, which must belong to the sender
    /// 4. Refuses a second pending request from the same sender on the same post
    ///
    /// # Returns
    ///
    /// * `Ok(TradeRequest)` - The stored, pending request
    /// * `Err(DomainError)` - A rule above failed
    pub async fn create_request(
        &self,
        sender_id: Uuid,
        new_request: NewTradeRequest,
    ) -> DomainResult<TradeRequest> {
        if let Some(message) = &new_request.message {
            if message.chars().count() > MAX_MESSAGE_CHARS {
                return Err(DomainError::ValidationErr(ValidationError::OutOfRange {
                    field: "message".to_string(),
                    min: "0".to_string(),
                    max: MAX_MESSAGE_CHARS.to_string(),
                }));
            }
        }

        let post = self
            .post_repository
            .find_by_id(new_request.post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post"))?;

        if post.is_owned_by(sender_id) {
            return Err(DomainError::BusinessRule {
                message: "You cannot open a trade request on your own post".to_string(),
            });
        }

        if let Some(offered_post_id) = new_request.offered_post_id {
            let offered = self
                .post_repository
                .find_by_id(offered_post_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Offered post"))?;
            if !offered.is_owned_by(sender_id) {
                return Err(DomainError::BusinessRule {
                    message: "The offered post must be one of your own".to_string(),
                });
            }
        }

        if self
            .trade_repository
            .pending_exists(new_request.post_id, sender_id)
            .await?
        {
            return Err(DomainError::BusinessRule {
                message: "A pending request for this post already exists".to_string(),
            });
        }

        let message = new_request
            .message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        let request = TradeRequest::new(
            new_request.post_id,
            sender_id,
            post.user_id,
            new_request.offered_post_id,
            message,
        );
        self.trade_repository.create(request).await
    }

    /// Requests the user has sent, newest first
    pub async fn sent_requests(&self, user_id: Uuid) -> DomainResult<Vec<TradeRequest>> {
        self.trade_repository.list_sent(user_id).await
    }

    /// Requests aimed at the user's posts, newest first
    pub async fn received_requests(&self, user_id: Uuid) -> DomainResult<Vec<TradeRequest>> {
        self.trade_repository.list_received(user_id).await
    }

    /// Load one trade request
    ///
    /// Only the two involved users may see a request.
    pub async fn request_detail(&self, user_id: Uuid, id: Uuid) -> DomainResult<TradeRequest> {
        let request = self
            .trade_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Trade request"))?;

        if !request.involves(user_id) {
            return Err(DomainError::Auth(AuthError::InsufficientPermissions));
        }

        Ok(request)
    }

    /// Settle a pending request
    ///
    /// Accepting and declining is the receiver's call, cancelling the
    /// sender's. A request that already reached a terminal state stays as
    /// it is.
    ///
    /// # Returns
    ///
    /// * `Ok(TradeRequest)` - The request in its new state
    /// * `Err(DomainError)` - Unknown request, wrong side, or already settled
    pub async fn respond(
        &self,
        user_id: Uuid,
        id: Uuid,
        decision: TradeDecision,
    ) -> DomainResult<TradeRequest> {
        let mut request = self
            .trade_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Trade request"))?;

        let allowed_user = match decision {
            TradeDecision::Accept | TradeDecision::Decline => request.receiver_id,
            TradeDecision::Cancel => request.sender_id,
        };
        if user_id != allowed_user {
            return Err(DomainError::Auth(AuthError::InsufficientPermissions));
        }

        if !request.transition(decision.target_status()) {
            return Err(DomainError::BusinessRule {
                message: format!("Trade request has already been {}", request.status),
            });
        }

        self.trade_repository
            .update_status(id, request.status)
            .await?;

        Ok(request)
    }
}
