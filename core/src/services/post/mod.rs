//! Post service module

mod service;

pub use service::{NewPost, NewPostImage, PostChanges, PostService, PostServiceConfig};
