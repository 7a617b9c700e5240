//! Outbound email configuration

use serde::{Deserialize, Serialize};

/// Mail delivery configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    /// Mail provider: "smtp" or "mock"
    pub provider: String,

    /// SMTP relay host
    pub smtp_host: String,

    /// SMTP relay port
    pub smtp_port: u16,

    /// SMTP username (optional for open relays)
    #[serde(default)]
    pub smtp_username: Option<String>,

    /// SMTP password
    #[serde(default)]
    pub smtp_password: Option<String>,

    /// Sender address
    pub from_address: String,

    /// Sender display name
    pub from_name: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            provider: String::from("mock"),
            smtp_host: String::from("localhost"),
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            from_address: String::from("no-reply@tradenest.app"),
            from_name: String::from("TradeNest"),
        }
    }
}

impl MailConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let provider = std::env::var("MAIL_PROVIDER").unwrap_or_else(|_| "mock".to_string());
        let smtp_host = std::env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string());
        let smtp_port = std::env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse()
            .unwrap_or(587);
        let from_address = std::env::var("MAIL_FROM_ADDRESS")
            .unwrap_or_else(|_| "no-reply@tradenest.app".to_string());
        let from_name =
            std::env::var("MAIL_FROM_NAME").unwrap_or_else(|_| "TradeNest".to_string());

        Self {
            provider,
            smtp_host,
            smtp_port,
            smtp_username: std::env::var("SMTP_USERNAME").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
            from_address,
            from_name,
        }
    }

    /// Check whether the real SMTP transport is selected
    pub fn is_smtp(&self) -> bool {
        self.provider.eq_ignore_ascii_case("smtp")
    }

    /// Formatted sender mailbox, e.g. `TradeNest <no-reply@tradenest.app>`
    pub fn sender(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_address)
    }
}
