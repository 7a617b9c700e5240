pub mod auth;
pub mod cors;
pub mod security;

pub use auth::{AccessTokenVerifier, AuthContext, JwtAuth};
pub use cors::create_cors;
pub use security::SecurityMiddleware;
