//! Repository traits decoupling domain services from persistence.
//!
//! Each submodule holds one trait plus an in-memory mock used by service unit
//! tests and by the HTTP integration tests.

pub mod confirmation;
pub mod post;
pub mod token;
pub mod trade;
pub mod user;

pub use confirmation::{ConfirmationRepository, MockConfirmationRepository};
pub use post::{MockPostRepository, PostRepository};
pub use token::{MockTokenRepository, TokenRepository};
pub use trade::{MockTradeRequestRepository, TradeRequestRepository};
pub use user::{MockUserRepository, UserRepository};
