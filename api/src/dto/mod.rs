//! Request and response bodies for the HTTP surface.
//!
//! DTOs keep the wire format decoupled from the domain entities; every
//! response type has a `From` conversion from its domain counterpart.

pub mod auth;
pub mod post;
pub mod trade;
pub mod user;

pub use auth::{
    AvailabilityResponse, LoginRequest, LogoutRequest, MessageResponse, RefreshTokenRequest,
    RegisterRequest, ResendConfirmationRequest, SessionResponse,
};
pub use post::{PostDto, RemoveImagesRequest};
pub use trade::{CreateTradeRequest, TradeRequestDto};
pub use user::UserDto;
