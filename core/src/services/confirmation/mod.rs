//! Email confirmation service module
//!
//! Issues the single-use confirmation tokens mailed out at registration and
//! consumes them when the confirmation link is visited.

mod service;

pub use service::{ConfirmationConfig, ConfirmationService};
