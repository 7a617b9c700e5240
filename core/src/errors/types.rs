//! Domain-specific error types for authentication and related operations
//!
//! This module provides error type definitions for authentication, token
//! management, and validation operations. HTTP status codes and client-facing
//! error codes are assigned in the presentation layer.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("User not found")]
    UserNotFound,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account not confirmed")]
    AccountNotConfirmed,

    #[error("Account disabled")]
    AccountDisabled,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Invalid confirmation token")]
    InvalidConfirmationToken,

    #[error("Confirmation token expired")]
    ConfirmationTokenExpired,
}

/// Token-related errors
///
/// These errors represent various token validation and management failures.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Invalid claims")]
    InvalidClaims,

    #[error("Token revoked")]
    TokenRevoked,

    #[error("Refresh token expired")]
    RefreshTokenExpired,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token generation failed")]
    TokenGenerationFailed,

    #[error("Missing claim: {claim}")]
    MissingClaim { claim: String },
}

/// Validation errors
///
/// These errors represent input validation failures.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Invalid format: {field}")]
    InvalidFormat { field: String },

    #[error("Out of range: {field} (min: {min}, max: {max})")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },

    #[error("Invalid length: {field} (expected: {expected}, actual: {actual})")]
    InvalidLength {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Pattern mismatch: {field}")]
    PatternMismatch { field: String },

    #[error("Invalid email")]
    InvalidEmail,

    #[error("Duplicate value: {field}")]
    DuplicateValue { field: String },

    #[error("Business rule violation: {rule}")]
    BusinessRuleViolation { rule: String },
}
