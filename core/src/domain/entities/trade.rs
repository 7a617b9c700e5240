//! Trade request entity: one user offering to swap for another user's post.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a trade request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    /// Awaiting an answer from the receiver
    Pending,
    /// Receiver accepted the exchange
    Accepted,
    /// Receiver declined the exchange
    Declined,
    /// Sender withdrew the request
    Cancelled,
}

impl TradeStatus {
    /// Terminal states cannot transition any further
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TradeStatus::Pending)
    }

    /// Database representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Pending => "pending",
            TradeStatus::Accepted => "accepted",
            TradeStatus::Declined => "declined",
            TradeStatus::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for TradeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TradeStatus::Pending),
            "accepted" => Ok(TradeStatus::Accepted),
            "declined" => Ok(TradeStatus::Declined),
            "cancelled" => Ok(TradeStatus::Cancelled),
            other => Err(format!("Unknown trade status: {}", other)),
        }
    }
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request to exchange goods, aimed at a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRequest {
    /// Unique identifier for the request
    pub id: Uuid,

    /// The post the sender wants
    pub post_id: Uuid,

    /// User who opened the request
    pub sender_id: Uuid,

    /// Owner of the requested post
    pub receiver_id: Uuid,

    /// Post the sender offers in exchange, if any
    pub offered_post_id: Option<Uuid>,

    /// Free-form message from the sender
    pub message: Option<String>,

    /// Current lifecycle state
    pub status: TradeStatus,

    /// Timestamp when the request was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the request was last updated
    pub updated_at: DateTime<Utc>,
}

impl TradeRequest {
    /// Creates a pending trade request
    pub fn new(
        post_id: Uuid,
        sender_id: Uuid,
        receiver_id: Uuid,
        offered_post_id: Option<Uuid>,
        message: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            post_id,
            sender_id,
            receiver_id,
            offered_post_id,
            message,
            status: TradeStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Either side of the exchange
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.sender_id == user_id || self.receiver_id == user_id
    }

    /// Whether `user_id` may answer (accept or decline) this request
    pub fn can_be_answered_by(&self, user_id: Uuid) -> bool {
        self.status == TradeStatus::Pending && self.receiver_id == user_id
    }

    /// Whether `user_id` may cancel this request
    pub fn can_be_cancelled_by(&self, user_id: Uuid) -> bool {
        self.status == TradeStatus::Pending && self.sender_id == user_id
    }

    /// Moves a pending request into a terminal state
    ///
    /// Returns `false` without changing anything when the request already
    /// reached a terminal state.
    pub fn transition(&mut self, status: TradeStatus) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = status;
        self.updated_at = Utc::now();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_request() -> TradeRequest {
        TradeRequest::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), None, None)
    }

    #[test]
    fn test_new_request_is_pending() {
        let request = pending_request();
        assert_eq!(request.status, TradeStatus::Pending);
        assert!(!request.status.is_terminal());
    }

    #[test]
    fn test_receiver_answers_sender_cancels() {
        let request = pending_request();

        assert!(request.can_be_answered_by(request.receiver_id));
        assert!(!request.can_be_answered_by(request.sender_id));

        assert!(request.can_be_cancelled_by(request.sender_id));
        assert!(!request.can_be_cancelled_by(request.receiver_id));
    }

    #[test]
    fn test_terminal_states_are_immutable() {
        let mut request = pending_request();
        assert!(request.transition(TradeStatus::Accepted));
        assert_eq!(request.status, TradeStatus::Accepted);

        assert!(!request.transition(TradeStatus::Cancelled));
        assert_eq!(request.status, TradeStatus::Accepted);

        assert!(!request.can_be_answered_by(request.receiver_id));
        assert!(!request.can_be_cancelled_by(request.sender_id));
    }

    #[test]
    fn test_involves_both_parties() {
        let request = pending_request();
        assert!(request.involves(request.sender_id));
        assert!(request.involves(request.receiver_id));
        assert!(!request.involves(Uuid::new_v4()));
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            TradeStatus::Pending,
            TradeStatus::Accepted,
            TradeStatus::Declined,
            TradeStatus::Cancelled,
        ] {
            let parsed: TradeStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("sideways".parse::<TradeStatus>().is_err());
    }
}
