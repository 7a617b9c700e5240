//! MySQL repository implementations
//!
//! Concrete SQLx-backed implementations of the repository traits defined
//! in `tn_core`. Each repository owns a clone of the shared connection
//! pool; all UUID columns are stored as CHAR(36) strings.

pub mod confirmation_repository_impl;
pub mod post_repository_impl;
pub mod token_repository_impl;
pub mod trade_repository_impl;
pub mod user_repository_impl;

pub use confirmation_repository_impl::MySqlConfirmationRepository;
pub use post_repository_impl::MySqlPostRepository;
pub use token_repository_impl::MySqlTokenRepository;
pub use trade_repository_impl::MySqlTradeRequestRepository;
pub use user_repository_impl::MySqlUserRepository;
