//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical business areas:
//! - `auth` - Authentication and token configuration
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection
//! - `mail` - Outbound email delivery
//! - `server` - HTTP server and CORS configuration
//! - `uploads` - File upload limits and paths

pub mod auth;
pub mod database;
pub mod environment;
pub mod mail;
pub mod server;
pub mod uploads;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use auth::{AuthConfig, JwtConfig};
pub use database::DatabaseConfig;
pub use environment::Environment;
pub use mail::MailConfig;
pub use server::{CorsConfig, ServerConfig};
pub use uploads::UploadConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Mail delivery configuration
    pub mail: MailConfig,

    /// Upload handling configuration
    pub uploads: UploadConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            mail: MailConfig::default(),
            uploads: UploadConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            environment: Environment::from_env(),
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            auth: AuthConfig::from_env(),
            mail: MailConfig::from_env(),
            uploads: UploadConfig::from_env(),
        }
    }

    /// Reject configurations that must not reach production
    pub fn validate(&self) -> Result<(), String> {
        if self.environment.is_production() {
            if self.auth.jwt.is_using_default_secret()
                || self.auth.jwt.secret == "development-secret-please-change-in-production"
            {
                return Err("JWT_SECRET must be set in production".to_string());
            }
            if !self.database.is_production() {
                return Err("DATABASE_URL points at localhost in production".to_string());
            }
            if !self.mail.is_smtp() {
                return Err("MAIL_PROVIDER must be smtp in production".to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid_for_development() {
        let config = AppConfig::default();
        assert!(config.environment.is_development());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_rejects_default_secret() {
        let mut config = AppConfig::default();
        config.environment = Environment::Production;
        assert!(config.validate().is_err());
    }
}
