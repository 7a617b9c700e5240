//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - JWT access token generation and verification
//! - Opaque refresh token issuance and rotation
//! - Token revocation and cleanup

mod config;
mod service;

pub use config::TokenConfig;
pub use service::TokenService;
