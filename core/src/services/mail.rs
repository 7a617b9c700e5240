//! Outbound mail port used by the domain services.
//!
//! The domain only describes the message; delivery is an infrastructure
//! concern wired in behind the [`Mailer`] trait.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A fully composed email ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    /// Recipient address
    pub to: String,
    /// Recipient display name
    pub to_name: String,
    /// Subject line
    pub subject: String,
    /// Plain text body
    pub body: String,
}

impl OutboundEmail {
    pub fn new(
        to: impl Into<String>,
        to_name: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            to_name: to_name.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Trait for mail delivery integration
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a single email
    ///
    /// Returns a provider-specific message id on success.
    async fn send(&self, email: &OutboundEmail) -> Result<String, String>;
}

/// Mock mailer that records every message instead of delivering it
pub struct MockMailer {
    sent: Arc<RwLock<Vec<OutboundEmail>>>,
    fail_sending: bool,
}

impl MockMailer {
    /// Create a mailer that accepts everything
    pub fn new() -> Self {
        Self {
            sent: Arc::new(RwLock::new(Vec::new())),
            fail_sending: false,
        }
    }

    /// Create a mailer that rejects every send attempt
    pub fn failing() -> Self {
        Self {
            sent: Arc::new(RwLock::new(Vec::new())),
            fail_sending: true,
        }
    }

    /// Messages accepted so far
    pub async fn sent_messages(&self) -> Vec<OutboundEmail> {
        self.sent.read().await.clone()
    }

    /// Number of messages accepted so far
    pub async fn sent_count(&self) -> usize {
        self.sent.read().await.len()
    }
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<String, String> {
        if self.fail_sending {
            return Err("smtp connection refused".to_string());
        }
        let mut sent = self.sent.write().await;
        sent.push(email.clone());
        Ok(format!("mock-{}", sent.len()))
    }
}
