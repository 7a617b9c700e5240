//! SMTP mail delivery via lettre.
//!
//! Messages are sent as plain text over a STARTTLS relay. Credentials are
//! optional so local relays without authentication keep working.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use tn_core::services::{Mailer, OutboundEmail};
use tn_shared::config::mail::MailConfig;

use crate::InfrastructureError;

/// SMTP implementation of the Mailer trait
pub struct SmtpMailer {
    /// Async SMTP transport handle; cheap to clone, pools connections
    transport: AsyncSmtpTransport<Tokio1Executor>,
    /// Sender mailbox applied to every outgoing message
    from: Mailbox,
}

impl SmtpMailer {
    /// Create a new SMTP mailer from configuration
    ///
    /// # Arguments
    /// * `config` - Mail configuration with relay host, port and credentials
    ///
    /// # Returns
    /// * `Result<Self, InfrastructureError>` - Mailer or configuration error
    pub fn new(config: &MailConfig) -> Result<Self, InfrastructureError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| InfrastructureError::Mail(format!("Invalid SMTP relay: {}", e)))?
            .port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from = format!("{} <{}>", config.from_name, config.from_address)
            .parse::<Mailbox>()
            .map_err(|e| InfrastructureError::Mail(format!("Invalid sender address: {}", e)))?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<String, String> {
        let to = format!("{} <{}>", email.to_name, email.to)
            .parse::<Mailbox>()
            .map_err(|e| format!("Invalid recipient address: {}", e))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| format!("Failed to build message: {}", e))?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| format!("SMTP delivery failed: {}", e))?;

        Ok(response.message().collect::<Vec<_>>().join(" "))
    }
}
