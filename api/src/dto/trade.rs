use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tn_core::domain::entities::{TradeRequest, TradeStatus};

/// Body for `POST /trades`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTradeRequest {
    /// The post the sender wants
    pub post_id: Uuid,
    /// Post offered in exchange, if any
    pub offered_post_id: Option<Uuid>,
    pub message: Option<String>,
}

/// Public view of a trade request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRequestDto {
    pub id: Uuid,
    pub post_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub offered_post_id: Option<Uuid>,
    pub message: Option<String>,
    pub status: TradeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TradeRequest> for TradeRequestDto {
    fn from(request: TradeRequest) -> Self {
        Self {
            id: request.id,
            post_id: request.post_id,
            sender_id: request.sender_id,
            receiver_id: request.receiver_id,
            offered_post_id: request.offered_post_id,
            message: request.message,
            status: request.status,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}
