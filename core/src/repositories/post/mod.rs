//! Post repository trait covering posts and their attached images.
//!
//! A post and its image rows are written together; `create_with_images` and
//! `update_with_images` are transactional in real implementations so a post
//! never appears without the images that were uploaded alongside it.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::post::{Post, PostImage, PostWithImages};
use crate::errors::DomainError;

mod mock;

pub use mock::MockPostRepository;

/// Repository trait for post persistence operations
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Persist a post together with its image rows in a single transaction
    ///
    /// # Arguments
    /// * `post` - The Post entity to persist
    /// * `images` - Image rows belonging to the post, possibly empty
    ///
    /// # Returns
    /// * `Ok(PostWithImages)` - The stored post with its images
    /// * `Err(DomainError)` - Persistence failed; nothing was written
    async fn create_with_images(
        &self,
        post: Post,
        images: Vec<PostImage>,
    ) -> Result<PostWithImages, DomainError>;

    /// Find a post by its unique identifier, without images
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError>;

    /// Find a post by its unique identifier, with all of its images
    async fn find_with_images(&self, id: Uuid) -> Result<Option<PostWithImages>, DomainError>;

    /// Fetch a feed page ordered by creation time, newest first
    ///
    /// Ordering is by `(created_at, id)` descending so rows created in the
    /// same instant still page deterministically. When `after` is given, only
    /// rows strictly older than that post are returned.
    ///
    /// # Arguments
    /// * `limit` - Maximum number of rows to return
    /// * `after` - Post the previous page ended on, if any
    ///
    /// # Returns
    /// * `Ok(Vec<PostWithImages>)` - Up to `limit` rows
    /// * `Err(DomainError)` - Unknown cursor post or database error
    async fn fetch_page(
        &self,
        limit: u32,
        after: Option<Uuid>,
    ) -> Result<Vec<PostWithImages>, DomainError>;

    /// Update a post and append new image rows in a single transaction
    ///
    /// # Arguments
    /// * `post` - The Post entity with updated fields
    /// * `new_images` - Additional image rows to attach, possibly empty
    ///
    /// # Returns
    /// * `Ok(PostWithImages)` - The updated post with all of its images
    /// * `Err(DomainError)` - Update failed; nothing was written
    async fn update_with_images(
        &self,
        post: &Post,
        new_images: Vec<PostImage>,
    ) -> Result<PostWithImages, DomainError>;

    /// Delete a post; image rows go with it
    ///
    /// # Returns
    /// * `Ok(true)` - Post was deleted
    /// * `Ok(false)` - Post not found
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// All image rows attached to a post
    async fn images_for_post(&self, post_id: Uuid) -> Result<Vec<PostImage>, DomainError>;

    /// Image rows matching any of the given public urls
    ///
    /// Used to resolve urls back to on-disk paths before files are unlinked.
    async fn images_by_urls(&self, urls: &[String]) -> Result<Vec<PostImage>, DomainError>;

    /// Delete image rows matching any of the given public urls
    ///
    /// # Returns
    /// * `Ok(count)` - Number of rows removed
    async fn delete_images_by_urls(&self, urls: &[String]) -> Result<u64, DomainError>;

    /// Number of image rows attached to a post
    async fn count_images(&self, post_id: Uuid) -> Result<u64, DomainError>;
}
