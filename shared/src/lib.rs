//! Shared utilities and common types for the TradeNest server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error types and response structures
//! - Utility functions (input validation, etc.)
//! - Common type definitions

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, Environment,
    AuthConfig, DatabaseConfig, MailConfig, ServerConfig, CorsConfig, UploadConfig,
};
pub use errors::{ErrorResponse, IntoErrorResponse, ApiResult, error_codes};
pub use types::{ApiResponse, Coordinate, CursorPage, HealthResponse};
pub use utils::validation;
