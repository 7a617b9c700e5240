//! Authentication route handlers
//!
//! Registration with email confirmation, login, refresh-token rotation,
//! logout, and the username/email availability probes.

pub mod availability;
pub mod confirm_email;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod register;

pub use availability::{email_available, username_available};
pub use confirm_email::{confirm_email, resend_confirmation};
pub use login::login;
pub use logout::logout;
pub use refresh::refresh;
pub use register::register;
