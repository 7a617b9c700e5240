//! Domain entities representing core business objects.

pub mod confirmation;
pub mod post;
pub mod token;
pub mod trade;
pub mod user;

// Re-export commonly used types
pub use confirmation::{
    EmailConfirmation, CONFIRMATION_TOKEN_EXPIRY_HOURS, CONFIRMATION_TOKEN_LENGTH,
};
pub use post::{Post, PostImage, PostWithImages};
pub use token::{
    Claims, RefreshToken, TokenPair, ACCESS_TOKEN_EXPIRY_MINUTES, JWT_AUDIENCE, JWT_ISSUER,
    REFRESH_TOKEN_EXPIRY_DAYS,
};
pub use trade::{TradeRequest, TradeStatus};
pub use user::User;
