//! Post route handlers
//!
//! The feed and the detail lookup are public; creating, editing and
//! deleting require authentication and ownership.

pub mod create;
pub mod delete;
pub mod detail;
pub mod feed;
pub mod form;
pub mod remove_images;
pub mod update;

pub use create::create_post;
pub use delete::delete_post;
pub use detail::post_detail;
pub use feed::feed;
pub use remove_images::remove_images;
pub use update::update_post;
