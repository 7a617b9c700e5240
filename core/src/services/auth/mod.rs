//! Authentication service module
//!
//! This module provides a complete authentication system including:
//! - User registration with email confirmation
//! - Credential login and logout
//! - Token generation and refresh with rotation

mod password;
mod service;

pub use password::{PasswordHasher, DEFAULT_BCRYPT_COST};
pub use service::{AuthService, Registration};
