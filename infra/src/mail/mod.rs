//! Mail Module
//!
//! Outbound mail transports behind the `Mailer` trait from `tn_core`.
//! SMTP delivery uses lettre; the in-memory mock from core serves
//! development setups that have no relay available.

use async_trait::async_trait;

use tn_core::services::{Mailer, MockMailer, OutboundEmail};
use tn_shared::config::mail::MailConfig;

use crate::InfrastructureError;

pub mod smtp;

pub use smtp::SmtpMailer;

/// The mail transport selected at startup
///
/// Domain services are generic over [`Mailer`], so the provider choice has
/// to resolve to one concrete type. This enum is that type.
pub enum AnyMailer {
    Smtp(SmtpMailer),
    Mock(MockMailer),
}

#[async_trait]
impl Mailer for AnyMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<String, String> {
        match self {
            AnyMailer::Smtp(mailer) => mailer.send(email).await,
            AnyMailer::Mock(mailer) => mailer.send(email).await,
        }
    }
}

/// Create a mailer based on configuration
///
/// Returns the transport named by `config.provider`. An unknown provider
/// falls back to the mock so a misconfigured environment still boots;
/// a broken SMTP configuration is a startup error instead, because
/// account confirmation depends on it.
///
/// # Arguments
///
/// * `config` - Mail configuration containing provider settings
///
/// # Returns
///
/// The selected mailer implementation
pub fn create_mailer(config: &MailConfig) -> Result<AnyMailer, InfrastructureError> {
    match config.provider.as_str() {
        "smtp" => {
            let mailer = SmtpMailer::new(config)?;
            tracing::info!("Using SMTP mail transport via {}", config.smtp_host);
            Ok(AnyMailer::Smtp(mailer))
        }
        "mock" => {
            tracing::info!("Using mock mail transport; outbound mail is not delivered");
            Ok(AnyMailer::Mock(MockMailer::new()))
        }
        other => {
            tracing::warn!("Unknown mail provider '{}', falling back to mock", other);
            Ok(AnyMailer::Mock(MockMailer::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_defaults_to_mock() {
        let config = MailConfig::default();
        assert!(matches!(create_mailer(&config), Ok(AnyMailer::Mock(_))));
    }

    #[test]
    fn test_factory_builds_smtp_mailer() {
        let config = MailConfig {
            provider: "smtp".to_string(),
            ..MailConfig::default()
        };
        assert!(matches!(create_mailer(&config), Ok(AnyMailer::Smtp(_))));
    }

    #[test]
    fn test_factory_falls_back_on_unknown_provider() {
        let config = MailConfig {
            provider: "carrier-pigeon".to_string(),
            ..MailConfig::default()
        };
        assert!(matches!(create_mailer(&config), Ok(AnyMailer::Mock(_))));
    }
}
