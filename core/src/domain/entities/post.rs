//! Post entity and its attached images.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tn_shared::types::Coordinate;
use uuid::Uuid;

/// A listing published by a user, offering an item for exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier for the post
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Short title shown in the feed
    pub title: String,

    /// Full description of the offered item
    pub description: String,

    /// Optional pickup location
    pub location: Option<Coordinate>,

    /// Timestamp when the post was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the post was last updated
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Creates a new post owned by `user_id`
    pub fn new(
        user_id: Uuid,
        title: String,
        description: String,
        location: Option<Coordinate>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            description,
            location,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks ownership
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Applies an edit, bumping `updated_at`
    pub fn apply_changes(
        &mut self,
        title: Option<String>,
        description: Option<String>,
        location: Option<Coordinate>,
    ) {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(location) = location {
            self.location = Some(location);
        }
        self.updated_at = Utc::now();
    }
}

/// Image attached to a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostImage {
    /// Unique identifier for the image
    pub id: Uuid,

    /// Post the image belongs to
    pub post_id: Uuid,

    /// On-disk path of the stored file
    #[serde(skip_serializing)]
    pub file_path: String,

    /// Public url, e.g. `uploads/<filename>`
    pub url: String,

    /// Timestamp when the image was stored
    pub created_at: DateTime<Utc>,
}

impl PostImage {
    /// Creates an image record for a post
    pub fn new(post_id: Uuid, file_path: String, url: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            file_path,
            url,
            created_at: Utc::now(),
        }
    }
}

/// Post together with all of its images, as returned by detail lookups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostWithImages {
    #[serde(flatten)]
    pub post: Post,

    pub images: Vec<PostImage>,
}

impl PostWithImages {
    pub fn new(post: Post, images: Vec<PostImage>) -> Self {
        Self { post, images }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ownership_check() {
        let owner = Uuid::new_v4();
        let post = Post::new(owner, "Bike".to_string(), "City bike".to_string(), None);

        assert!(post.is_owned_by(owner));
        assert!(!post.is_owned_by(Uuid::new_v4()));
    }

    #[test]
    fn test_apply_changes_keeps_unset_fields() {
        let mut post = Post::new(
            Uuid::new_v4(),
            "Bike".to_string(),
            "City bike".to_string(),
            None,
        );

        post.apply_changes(Some("Mountain bike".to_string()), None, None);

        assert_eq!(post.title, "Mountain bike");
        assert_eq!(post.description, "City bike");
        assert!(post.location.is_none());
    }

    #[test]
    fn test_image_file_path_not_serialized() {
        let image = PostImage::new(
            Uuid::new_v4(),
            "/srv/uploads/a.jpg".to_string(),
            "uploads/a.jpg".to_string(),
        );
        let json = serde_json::to_string(&image).unwrap();
        assert!(!json.contains("/srv/uploads"));
        assert!(json.contains("uploads/a.jpg"));
    }
}
