//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the TradeNest backend.
//! It provides concrete implementations for data persistence and outbound
//! mail, behind the repository and mailer traits defined in `tn_core`.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL implementations using SQLx, plus pool management
//!   and embedded migrations
//! - **Mail**: SMTP delivery via lettre, with the in-memory mock from
//!   `tn_core` available for development
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Mail module - outbound mail transports
pub mod mail;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection or query error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Mail transport error
    #[error("Mail transport error: {0}")]
    Mail(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
