//! Profile route handlers, all scoped to the authenticated user.

pub mod disable;
pub mod profile;
pub mod update_profile;

pub use disable::disable_account;
pub use profile::profile;
pub use update_profile::update_profile;
