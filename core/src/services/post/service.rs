//! Post publishing, feed pagination, and post editing.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::post::{Post, PostImage, PostWithImages};
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::PostRepository;

use tn_shared::config::UploadConfig;
use tn_shared::types::{Coordinate, CursorPage, CursorPagination};
use tn_shared::utils::validation::validators;

/// Longest accepted post title
const MAX_TITLE_CHARS: usize = 150;

/// Longest accepted post description
const MAX_DESCRIPTION_CHARS: usize = 5000;

/// Configuration for the post service
#[derive(Debug, Clone)]
pub struct PostServiceConfig {
    /// Maximum number of images attached to one post
    pub max_images_per_post: usize,
}

impl Default for PostServiceConfig {
    fn default() -> Self {
        Self {
            max_images_per_post: 6,
        }
    }
}

impl From<&UploadConfig> for PostServiceConfig {
    fn from(config: &UploadConfig) -> Self {
        Self {
            max_images_per_post: config.max_images_per_post,
        }
    }
}

/// An uploaded image file ready to be attached to a post
#[derive(Debug, Clone)]
pub struct NewPostImage {
    /// On-disk path of the stored file
    pub file_path: String,
    /// Public url of the stored file
    pub url: String,
}

/// Data for publishing a new post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub description: String,
    pub location: Option<Coordinate>,
    pub images: Vec<NewPostImage>,
}

/// An edit to an existing post
///
/// Unset fields are left as they are. `new_images` are appended;
/// `removed_image_urls` name images to detach.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<Coordinate>,
    pub new_images: Vec<NewPostImage>,
    pub removed_image_urls: Vec<String>,
}

/// Service for managing posts and the feed
pub struct PostService<P: PostRepository> {
    repository: Arc<P>,
    config: PostServiceConfig,
}

impl<P: PostRepository> PostService<P> {
    /// Create a new post service
    pub fn new(repository: Arc<P>, config: PostServiceConfig) -> Self {
        Self { repository, config }
    }

    /// Publish a new post with its images
    ///
    /// The post row and all image rows are written in one transaction; a
    /// post never appears in the feed missing the images uploaded with it.
    ///
    /// # Returns
    ///
    /// * `Ok(PostWithImages)` - The stored post
    /// * `Err(DomainError)` - Validation failed or too many images
    pub async fn create_post(&self, user_id: Uuid, new_post: NewPost) -> DomainResult<PostWithImages> {
        validate_title(&new_post.title)?;
        validate_description(&new_post.description)?;
        validate_location(new_post.location.as_ref())?;

        if new_post.images.len() > self.config.max_images_per_post {
            return Err(DomainError::BusinessRule {
                message: format!(
                    "A post can carry at most {} images",
                    self.config.max_images_per_post
                ),
            });
        }

        let post = Post::new(
            user_id,
            new_post.title.trim().to_string(),
            new_post.description.trim().to_string(),
            new_post.location,
        );
        let images = new_post
            .images
            .into_iter()
            .map(|image| PostImage::new(post.id, image.file_path, image.url))
            .collect();

        self.repository.create_with_images(post, images).await
    }

    /// Fetch a feed page, newest posts first
    ///
    /// # Returns
    ///
    /// * `Ok(CursorPage<PostWithImages>)` - Page plus continuation cursor
    /// * `Err(DomainError)` - Malformed or unknown cursor
    pub async fn feed(&self, pagination: CursorPagination) -> DomainResult<CursorPage<PostWithImages>> {
        let limit = pagination.clamped_limit();
        let after = match &pagination.after {
            Some(cursor) => Some(
                Uuid::parse_str(cursor)
                    .map_err(|_| DomainError::validation("Invalid feed cursor"))?,
            ),
            None => None,
        };

        // One extra row tells us whether another page exists
        let mut rows = self.repository.fetch_page(limit + 1, after).await?;

        let has_more = rows.len() > limit as usize;
        if has_more {
            rows.truncate(limit as usize);
        }
        let next_cursor = if has_more {
            rows.last().map(|row| row.post.id.to_string())
        } else {
            None
        };

        Ok(CursorPage::new(rows, next_cursor, has_more))
    }

    /// Load one post with its images
    pub async fn post_detail(&self, id: Uuid) -> DomainResult<PostWithImages> {
        self.repository
            .find_with_images(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post"))
    }

    /// Edit a post
    ///
    /// Only the owner may edit. Removed images are reported back with their
    /// file paths so the caller can unlink them once the rows are gone.
    ///
    /// # Returns
    ///
    /// * `Ok((PostWithImages, Vec<PostImage>))` - Updated post and detached images
    /// * `Err(DomainError)` - Post missing, foreign post, or invalid change
    pub async fn update_post(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        changes: PostChanges,
    ) -> DomainResult<(PostWithImages, Vec<PostImage>)> {
        let mut post = self
            .repository
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post"))?;

        if !post.is_owned_by(user_id) {
            return Err(DomainError::Auth(AuthError::InsufficientPermissions));
        }

        if let Some(title) = &changes.title {
            validate_title(title)?;
        }
        if let Some(description) = &changes.description {
            validate_description(description)?;
        }
        validate_location(changes.location.as_ref())?;

        // Only images that actually belong to this post can be detached
        let removed: Vec<PostImage> = self
            .repository
            .images_by_urls(&changes.removed_image_urls)
            .await?
            .into_iter()
            .filter(|image| image.post_id == post_id)
            .collect();

        let current = self.repository.count_images(post_id).await? as usize;
        let after_edit = current - removed.len() + changes.new_images.len();
        if after_edit > self.config.max_images_per_post {
            return Err(DomainError::BusinessRule {
                message: format!(
                    "A post can carry at most {} images",
                    self.config.max_images_per_post
                ),
            });
        }

        if !removed.is_empty() {
            let urls: Vec<String> = removed.iter().map(|image| image.url.clone()).collect();
            self.repository.delete_images_by_urls(&urls).await?;
        }

        post.apply_changes(
            changes.title.map(|v| v.trim().to_string()),
            changes.description.map(|v| v.trim().to_string()),
            changes.location,
        );
        let new_images = changes
            .new_images
            .into_iter()
            .map(|image| PostImage::new(post_id, image.file_path, image.url))
            .collect();

        let updated = self.repository.update_with_images(&post, new_images).await?;
        Ok((updated, removed))
    }

    /// Delete a post
    ///
    /// Only the owner may delete. The image rows that went with the post are
    /// returned so the caller can unlink the files.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<PostImage>)` - Images that belonged to the deleted post
    /// * `Err(DomainError)` - Post missing or foreign post
    pub async fn delete_post(&self, user_id: Uuid, post_id: Uuid) -> DomainResult<Vec<PostImage>> {
        let post = self
            .repository
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post"))?;

        if !post.is_owned_by(user_id) {
            return Err(DomainError::Auth(AuthError::InsufficientPermissions));
        }

        let images = self.repository.images_for_post(post_id).await?;
        if !self.repository.delete(post_id).await? {
            return Err(DomainError::not_found("Post"));
        }

        Ok(images)
    }
}

fn validate_title(title: &str) -> DomainResult<()> {
    let title = title.trim();
    if !validators::not_empty(title) {
        return Err(DomainError::ValidationErr(ValidationError::RequiredField {
            field: "title".to_string(),
        }));
    }
    if !validators::length_between(title, 1, MAX_TITLE_CHARS) {
        return Err(DomainError::ValidationErr(ValidationError::OutOfRange {
            field: "title".to_string(),
            min: "1".to_string(),
            max: MAX_TITLE_CHARS.to_string(),
        }));
    }
    Ok(())
}

fn validate_description(description: &str) -> DomainResult<()> {
    let description = description.trim();
    if !validators::not_empty(description) {
        return Err(DomainError::ValidationErr(ValidationError::RequiredField {
            field: "description".to_string(),
        }));
    }
    if !validators::length_between(description, 1, MAX_DESCRIPTION_CHARS) {
        return Err(DomainError::ValidationErr(ValidationError::OutOfRange {
            field: "description".to_string(),
            min: "1".to_string(),
            max: MAX_DESCRIPTION_CHARS.to_string(),
        }));
    }
    Ok(())
}

fn validate_location(location: Option<&Coordinate>) -> DomainResult<()> {
    if let Some(location) = location {
        if !location.is_valid() {
            return Err(DomainError::ValidationErr(ValidationError::OutOfRange {
                field: "location".to_string(),
                min: "-90/-180".to_string(),
                max: "90/180".to_string(),
            }));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockPostRepository;
    use chrono::Duration;

    fn service() -> (PostService<MockPostRepository>, Arc<MockPostRepository>) {
        let repository = Arc::new(MockPostRepository::new());
        (
            PostService::new(repository.clone(), PostServiceConfig::default()),
            repository,
        )
    }

    fn new_post(title: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            description: "Well kept, pickup only.".to_string(),
            location: None,
            images: vec![],
        }
    }

    fn image(name: &str) -> NewPostImage {
        NewPostImage {
            file_path: format!("/srv/uploads/{name}"),
            url: format!("uploads/{name}"),
        }
    }

    #[tokio::test]
    async fn test_create_post_with_images() {
        let (service, _) = service();
        let owner = Uuid::new_v4();
        let mut post = new_post("City bike");
        post.images = vec![image("a.jpg"), image("b.jpg")];

        let stored = service.create_post(owner, post).await.unwrap();
        assert_eq!(stored.post.user_id, owner);
        assert_eq!(stored.images.len(), 2);
        assert_eq!(stored.images[0].url, "uploads/a.jpg");
    }

    #[tokio::test]
    async fn test_create_post_validates_input() {
        let (service, _) = service();
        let owner = Uuid::new_v4();

        let result = service.create_post(owner, new_post("   ")).await;
        assert!(matches!(result, Err(DomainError::ValidationErr(_))));

        let mut too_many = new_post("City bike");
        too_many.images = (0..7).map(|i| image(&format!("{i}.jpg"))).collect();
        let result = service.create_post(owner, too_many).await;
        assert!(matches!(result, Err(DomainError::BusinessRule { .. })));

        let mut bad_location = new_post("City bike");
        bad_location.location = Some(Coordinate::new(123.0, 45.0));
        let result = service.create_post(owner, bad_location).await;
        assert!(matches!(result, Err(DomainError::ValidationErr(_))));
    }

    #[tokio::test]
    async fn test_feed_pages_with_cursor() {
        let (service, repository) = service();
        let owner = Uuid::new_v4();

        // Three posts with distinct creation times
        for (i, title) in ["oldest", "middle", "newest"].iter().enumerate() {
            let mut post = Post::new(
                owner,
                title.to_string(),
                "description".to_string(),
                None,
            );
            post.created_at = post.created_at - Duration::hours(3 - i as i64);
            repository.create_with_images(post, vec![]).await.unwrap();
        }

        let first = service
            .feed(CursorPagination {
                after: None,
                limit: 2,
            })
            .await
            .unwrap();
        assert_eq!(first.data.len(), 2);
        assert!(first.has_more);
        assert_eq!(first.data[0].post.title, "newest");
        let cursor = first.next_cursor.clone().unwrap();
        assert_eq!(cursor, first.data[1].post.id.to_string());

        let second = service
            .feed(CursorPagination {
                after: Some(cursor),
                limit: 2,
            })
            .await
            .unwrap();
        assert_eq!(second.data.len(), 1);
        assert!(!second.has_more);
        assert!(second.next_cursor.is_none());
        assert_eq!(second.data[0].post.title, "oldest");
    }

    #[tokio::test]
    async fn test_feed_rejects_malformed_cursor() {
        let (service, _) = service();
        let result = service
            .feed(CursorPagination {
                after: Some("not-a-uuid".to_string()),
                limit: 10,
            })
            .await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_update_post_is_owner_only() {
        let (service, _) = service();
        let owner = Uuid::new_v4();
        let stored = service.create_post(owner, new_post("City bike")).await.unwrap();

        let result = service
            .update_post(
                Uuid::new_v4(),
                stored.post.id,
                PostChanges {
                    title: Some("Stolen bike".to_string()),
                    ..PostChanges::default()
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::InsufficientPermissions))
        ));
    }

    #[tokio::test]
    async fn test_update_post_edits_and_detaches_images() {
        let (service, _) = service();
        let owner = Uuid::new_v4();
        let mut post = new_post("City bike");
        post.images = vec![image("a.jpg"), image("b.jpg")];
        let stored = service.create_post(owner, post).await.unwrap();

        let (updated, removed) = service
            .update_post(
                owner,
                stored.post.id,
                PostChanges {
                    title: Some("Mountain bike".to_string()),
                    new_images: vec![image("c.jpg")],
                    removed_image_urls: vec![
                        "uploads/a.jpg".to_string(),
                        // Someone else's image must not be detachable
                        "uploads/elsewhere.jpg".to_string(),
                    ],
                    ..PostChanges::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.post.title, "Mountain bike");
        let urls: Vec<&str> = updated.images.iter().map(|i| i.url.as_str()).collect();
        assert!(urls.contains(&"uploads/b.jpg"));
        assert!(urls.contains(&"uploads/c.jpg"));
        assert!(!urls.contains(&"uploads/a.jpg"));

        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].file_path, "/srv/uploads/a.jpg");
    }

    #[tokio::test]
    async fn test_update_post_enforces_image_cap() {
        let (service, _) = service();
        let owner = Uuid::new_v4();
        let mut post = new_post("City bike");
        post.images = (0..6).map(|i| image(&format!("{i}.jpg"))).collect();
        let stored = service.create_post(owner, post).await.unwrap();

        let result = service
            .update_post(
                owner,
                stored.post.id,
                PostChanges {
                    new_images: vec![image("one-too-many.jpg")],
                    ..PostChanges::default()
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::BusinessRule { .. })));
    }

    #[tokio::test]
    async fn test_delete_post_returns_images_for_cleanup() {
        let (service, repository) = service();
        let owner = Uuid::new_v4();
        let mut post = new_post("City bike");
        post.images = vec![image("a.jpg")];
        let stored = service.create_post(owner, post).await.unwrap();

        let result = service.delete_post(Uuid::new_v4(), stored.post.id).await;
        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::InsufficientPermissions))
        ));

        let images = service.delete_post(owner, stored.post.id).await.unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].file_path, "/srv/uploads/a.jpg");
        assert!(repository.is_empty().await);

        let result = service.delete_post(owner, stored.post.id).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
