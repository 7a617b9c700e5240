//! Mock implementation of PostRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::post::{Post, PostImage, PostWithImages};
use crate::errors::DomainError;

use super::PostRepository;

/// In-memory post repository for testing
///
/// Replicates the `(created_at, id)` descending keyset ordering real
/// implementations use for the feed.
pub struct MockPostRepository {
    posts: Arc<RwLock<HashMap<Uuid, Post>>>,
    images: Arc<RwLock<HashMap<Uuid, PostImage>>>,
}

impl MockPostRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            posts: Arc::new(RwLock::new(HashMap::new())),
            images: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored posts
    pub async fn len(&self) -> usize {
        self.posts.read().await.len()
    }

    /// True when no posts are stored
    pub async fn is_empty(&self) -> bool {
        self.posts.read().await.is_empty()
    }

    fn sorted_images_of(images: &HashMap<Uuid, PostImage>, post_id: Uuid) -> Vec<PostImage> {
        let mut found: Vec<PostImage> = images
            .values()
            .filter(|i| i.post_id == post_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        found
    }
}

impl Default for MockPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for MockPostRepository {
    async fn create_with_images(
        &self,
        post: Post,
        images: Vec<PostImage>,
    ) -> Result<PostWithImages, DomainError> {
        let mut posts = self.posts.write().await;
        let mut stored_images = self.images.write().await;

        posts.insert(post.id, post.clone());
        for image in &images {
            stored_images.insert(image.id, image.clone());
        }

        Ok(PostWithImages::new(post, images))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let posts = self.posts.read().await;
        Ok(posts.get(&id).cloned())
    }

    async fn find_with_images(&self, id: Uuid) -> Result<Option<PostWithImages>, DomainError> {
        let posts = self.posts.read().await;
        let images = self.images.read().await;

        Ok(posts
            .get(&id)
            .map(|post| PostWithImages::new(post.clone(), Self::sorted_images_of(&images, id))))
    }

    async fn fetch_page(
        &self,
        limit: u32,
        after: Option<Uuid>,
    ) -> Result<Vec<PostWithImages>, DomainError> {
        let posts = self.posts.read().await;
        let images = self.images.read().await;

        let cursor = match after {
            Some(id) => match posts.get(&id) {
                Some(post) => Some((post.created_at, post.id)),
                None => {
                    return Err(DomainError::Validation {
                        message: "Unknown feed cursor".to_string(),
                    })
                }
            },
            None => None,
        };

        let mut rows: Vec<&Post> = posts.values().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(rows
            .into_iter()
            .filter(|p| match cursor {
                Some(pair) => (p.created_at, p.id) < pair,
                None => true,
            })
            .take(limit as usize)
            .map(|p| PostWithImages::new(p.clone(), Self::sorted_images_of(&images, p.id)))
            .collect())
    }

    async fn update_with_images(
        &self,
        post: &Post,
        new_images: Vec<PostImage>,
    ) -> Result<PostWithImages, DomainError> {
        let mut posts = self.posts.write().await;
        let mut images = self.images.write().await;

        if !posts.contains_key(&post.id) {
            return Err(DomainError::NotFound {
                resource: "Post".to_string(),
            });
        }

        posts.insert(post.id, post.clone());
        for image in new_images {
            images.insert(image.id, image);
        }

        Ok(PostWithImages::new(
            post.clone(),
            Self::sorted_images_of(&images, post.id),
        ))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut posts = self.posts.write().await;
        let mut images = self.images.write().await;

        let removed = posts.remove(&id).is_some();
        if removed {
            images.retain(|_, image| image.post_id != id);
        }
        Ok(removed)
    }

    async fn images_for_post(&self, post_id: Uuid) -> Result<Vec<PostImage>, DomainError> {
        let images = self.images.read().await;
        Ok(Self::sorted_images_of(&images, post_id))
    }

    async fn images_by_urls(&self, urls: &[String]) -> Result<Vec<PostImage>, DomainError> {
        let images = self.images.read().await;
        Ok(images
            .values()
            .filter(|i| urls.contains(&i.url))
            .cloned()
            .collect())
    }

    async fn delete_images_by_urls(&self, urls: &[String]) -> Result<u64, DomainError> {
        let mut images = self.images.write().await;
        let initial = images.len();
        images.retain(|_, image| !urls.contains(&image.url));
        Ok((initial - images.len()) as u64)
    }

    async fn count_images(&self, post_id: Uuid) -> Result<u64, DomainError> {
        let images = self.images.read().await;
        Ok(images.values().filter(|i| i.post_id == post_id).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_post(title: &str) -> Post {
        Post::new(
            Uuid::new_v4(),
            title.to_string(),
            "description".to_string(),
            None,
        )
    }

    fn sample_image(post_id: Uuid, name: &str) -> PostImage {
        PostImage::new(
            post_id,
            format!("/srv/uploads/{name}"),
            format!("uploads/{name}"),
        )
    }

    #[tokio::test]
    async fn test_create_with_images_stores_both() {
        let repo = MockPostRepository::new();
        let post = sample_post("Bike");
        let post_id = post.id;
        let images = vec![sample_image(post_id, "a.jpg"), sample_image(post_id, "b.jpg")];

        let stored = repo.create_with_images(post, images).await.unwrap();
        assert_eq!(stored.images.len(), 2);

        let detail = repo.find_with_images(post_id).await.unwrap().unwrap();
        assert_eq!(detail.images.len(), 2);
        assert_eq!(repo.count_images(post_id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_fetch_page_orders_newest_first() {
        let repo = MockPostRepository::new();
        let mut older = sample_post("older");
        older.created_at = older.created_at - Duration::hours(2);
        let mut middle = sample_post("middle");
        middle.created_at = middle.created_at - Duration::hours(1);
        let newest = sample_post("newest");

        repo.create_with_images(older, vec![]).await.unwrap();
        repo.create_with_images(newest, vec![]).await.unwrap();
        repo.create_with_images(middle, vec![]).await.unwrap();

        let page = repo.fetch_page(10, None).await.unwrap();
        let titles: Vec<&str> = page.iter().map(|p| p.post.title.as_str()).collect();
        assert_eq!(titles, vec!["newest", "middle", "older"]);
    }

    #[tokio::test]
    async fn test_fetch_page_after_cursor_skips_newer_rows() {
        let repo = MockPostRepository::new();
        let mut older = sample_post("older");
        older.created_at = older.created_at - Duration::hours(2);
        let mut middle = sample_post("middle");
        middle.created_at = middle.created_at - Duration::hours(1);
        let middle_id = middle.id;
        let newest = sample_post("newest");

        repo.create_with_images(older, vec![]).await.unwrap();
        repo.create_with_images(middle, vec![]).await.unwrap();
        repo.create_with_images(newest, vec![]).await.unwrap();

        let page = repo.fetch_page(10, Some(middle_id)).await.unwrap();
        let titles: Vec<&str> = page.iter().map(|p| p.post.title.as_str()).collect();
        assert_eq!(titles, vec!["older"]);
    }

    #[tokio::test]
    async fn test_fetch_page_unknown_cursor_is_rejected() {
        let repo = MockPostRepository::new();
        repo.create_with_images(sample_post("Bike"), vec![])
            .await
            .unwrap();

        let result = repo.fetch_page(10, Some(Uuid::new_v4())).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_delete_removes_images() {
        let repo = MockPostRepository::new();
        let post = sample_post("Bike");
        let post_id = post.id;
        repo.create_with_images(post, vec![sample_image(post_id, "a.jpg")])
            .await
            .unwrap();

        assert!(repo.delete(post_id).await.unwrap());
        assert_eq!(repo.count_images(post_id).await.unwrap(), 0);
        assert!(!repo.delete(post_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_images_by_urls_and_delete_by_urls() {
        let repo = MockPostRepository::new();
        let post = sample_post("Bike");
        let post_id = post.id;
        repo.create_with_images(
            post,
            vec![sample_image(post_id, "a.jpg"), sample_image(post_id, "b.jpg")],
        )
        .await
        .unwrap();

        let urls = vec!["uploads/a.jpg".to_string()];
        let matched = repo.images_by_urls(&urls).await.unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].file_path, "/srv/uploads/a.jpg");

        assert_eq!(repo.delete_images_by_urls(&urls).await.unwrap(), 1);
        assert_eq!(repo.count_images(post_id).await.unwrap(), 1);
    }
}
