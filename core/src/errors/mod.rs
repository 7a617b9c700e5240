//! Domain-specific error types and error handling.

mod types;

// Re-export all error types
pub use types::{AuthError, TokenError, ValidationError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Business rule violation: {message}")]
    BusinessRule { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Mail delivery error: {message}")]
    Mail { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

impl DomainError {
    /// Shorthand for a `NotFound` error over a named resource
    pub fn not_found(resource: impl Into<String>) -> Self {
        DomainError::NotFound {
            resource: resource.into(),
        }
    }

    /// Shorthand for a `Validation` error with a message
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation {
            message: message.into(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_converts_into_domain_error() {
        let error: DomainError = AuthError::UserNotFound.into();
        assert!(matches!(error, DomainError::Auth(AuthError::UserNotFound)));
    }

    #[test]
    fn test_token_error_converts_into_domain_error() {
        let error: DomainError = TokenError::TokenExpired.into();
        assert!(matches!(error, DomainError::Token(TokenError::TokenExpired)));
    }

    #[test]
    fn test_not_found_display_names_resource() {
        let error = DomainError::not_found("post");
        assert_eq!(error.to_string(), "Resource not found: post");
    }
}
