//! Business services containing domain logic and use cases.

pub mod auth;
pub mod confirmation;
pub mod mail;
pub mod post;
pub mod token;
pub mod trade;
pub mod user;

// Re-export commonly used types
pub use auth::{AuthService, PasswordHasher, Registration};
pub use confirmation::{ConfirmationConfig, ConfirmationService};
pub use mail::{Mailer, MockMailer, OutboundEmail};
pub use post::{NewPost, NewPostImage, PostChanges, PostService, PostServiceConfig};
pub use token::{TokenConfig, TokenService};
pub use trade::{NewTradeRequest, TradeDecision, TradeService};
pub use user::{AvatarUpload, ProfileChanges, UserService};
