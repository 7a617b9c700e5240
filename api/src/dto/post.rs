use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tn_core::domain::entities::PostWithImages;
use tn_shared::types::Coordinate;

/// Public view of a post
///
/// Images are flattened to their public urls; the on-disk paths stay
/// server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: Option<Coordinate>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PostWithImages> for PostDto {
    fn from(post: PostWithImages) -> Self {
        let PostWithImages { post, images } = post;
        Self {
            id: post.id,
            user_id: post.user_id,
            title: post.title,
            description: post.description,
            location: post.location,
            images: images.into_iter().map(|image| image.url).collect(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Body for `DELETE /posts/{id}/images`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveImagesRequest {
    /// Public urls of the images to detach
    pub urls: Vec<String>,
}
