//! User profile service module

mod service;

pub use service::{AvatarUpload, ProfileChanges, UserService};
