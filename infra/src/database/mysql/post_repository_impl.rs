//! MySQL implementation of the PostRepository trait.
//!
//! Posts and their image rows are written together inside transactions so
//! a failed image insert never leaves a half-created post behind. Feed
//! pages use keyset pagination over the `(created_at, id)` index instead
//! of OFFSET scans.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use tn_core::domain::entities::post::{Post, PostImage, PostWithImages};
use tn_core::errors::DomainError;
use tn_core::repositories::PostRepository;
use tn_shared::types::Coordinate;

const POST_COLUMNS: &str =
    "id, user_id, title, description, latitude, longitude, created_at, updated_at";
const IMAGE_COLUMNS: &str = "id, post_id, file_path, url, created_at";

/// MySQL implementation of PostRepository
pub struct MySqlPostRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlPostRepository {
    /// Create a new MySQL post repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to Post entity
    ///
    /// The coordinate is stored as two nullable columns; both must be
    /// present for the post to carry a location.
    fn row_to_post(row: &sqlx::mysql::MySqlRow) -> Result<Post, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Database {
            message: format!("Failed to get id: {}", e),
        })?;

        let user_id: String = row.try_get("user_id").map_err(|e| DomainError::Database {
            message: format!("Failed to get user_id: {}", e),
        })?;

        let latitude: Option<f64> = row.try_get("latitude").map_err(|e| DomainError::Database {
            message: format!("Failed to get latitude: {}", e),
        })?;

        let longitude: Option<f64> = row.try_get("longitude").map_err(|e| DomainError::Database {
            message: format!("Failed to get longitude: {}", e),
        })?;

        let location = match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate::new(latitude, longitude)),
            _ => None,
        };

        Ok(Post {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Database {
                message: format!("Invalid post UUID: {}", e),
            })?,
            user_id: Uuid::parse_str(&user_id).map_err(|e| DomainError::Database {
                message: format!("Invalid user UUID: {}", e),
            })?,
            title: row.try_get("title").map_err(|e| DomainError::Database {
                message: format!("Failed to get title: {}", e),
            })?,
            description: row
                .try_get("description")
                .map_err(|e| DomainError::Database {
                    message: format!("Failed to get description: {}", e),
                })?,
            location,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Database {
                    message: format!("Failed to get created_at: {}", e),
                })?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| DomainError::Database {
                    message: format!("Failed to get updated_at: {}", e),
                })?,
        })
    }

    /// Convert database row to PostImage entity
    fn row_to_image(row: &sqlx::mysql::MySqlRow) -> Result<PostImage, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Database {
            message: format!("Failed to get id: {}", e),
        })?;

        let post_id: String = row.try_get("post_id").map_err(|e| DomainError::Database {
            message: format!("Failed to get post_id: {}", e),
        })?;

        Ok(PostImage {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Database {
                message: format!("Invalid image UUID: {}", e),
            })?,
            post_id: Uuid::parse_str(&post_id).map_err(|e| DomainError::Database {
                message: format!("Invalid post UUID: {}", e),
            })?,
            file_path: row.try_get("file_path").map_err(|e| DomainError::Database {
                message: format!("Failed to get file_path: {}", e),
            })?,
            url: row.try_get("url").map_err(|e| DomainError::Database {
                message: format!("Failed to get url: {}", e),
            })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Database {
                    message: format!("Failed to get created_at: {}", e),
                })?,
        })
    }

    /// Load images for a batch of posts in one query, grouped by post
    async fn load_images_for(
        &self,
        post_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<PostImage>>, DomainError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; post_ids.len()].join(", ");
        let query = format!(
            "SELECT {} FROM post_images WHERE post_id IN ({}) ORDER BY created_at ASC, id ASC",
            IMAGE_COLUMNS, placeholders
        );

        let mut statement = sqlx::query(&query);
        for post_id in post_ids {
            statement = statement.bind(post_id.to_string());
        }

        let rows = statement
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to load post images: {}", e),
            })?;

        let mut grouped: HashMap<Uuid, Vec<PostImage>> = HashMap::new();
        for row in rows {
            let image = Self::row_to_image(&row)?;
            grouped.entry(image.post_id).or_default().push(image);
        }

        Ok(grouped)
    }
}

#[async_trait]
impl PostRepository for MySqlPostRepository {
    async fn create_with_images(
        &self,
        post: Post,
        images: Vec<PostImage>,
    ) -> Result<PostWithImages, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Database {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        let post_query = r#"
            INSERT INTO posts (
                id, user_id, title, description,
                latitude, longitude, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(post_query)
            .bind(post.id.to_string())
            .bind(post.user_id.to_string())
            .bind(&post.title)
            .bind(&post.description)
            .bind(post.location.map(|c| c.latitude))
            .bind(post.location.map(|c| c.longitude))
            .bind(post.created_at)
            .bind(post.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to create post: {}", e),
            })?;

        let image_query = r#"
            INSERT INTO post_images (
                id, post_id, file_path, url, created_at
            ) VALUES (?, ?, ?, ?, ?)
        "#;

        for image in &images {
            sqlx::query(image_query)
                .bind(image.id.to_string())
                .bind(image.post_id.to_string())
                .bind(&image.file_path)
                .bind(&image.url)
                .bind(image.created_at)
                .execute(&mut *tx)
                .await
                .map_err(|e| DomainError::Database {
                    message: format!("Failed to create post image: {}", e),
                })?;
        }

        tx.commit().await.map_err(|e| DomainError::Database {
            message: format!("Failed to commit post creation: {}", e),
        })?;

        Ok(PostWithImages { post, images })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let query = format!("SELECT {} FROM posts WHERE id = ? LIMIT 1", POST_COLUMNS);

        let result = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Database query failed: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_post(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_with_images(&self, id: Uuid) -> Result<Option<PostWithImages>, DomainError> {
        let post = match self.find_by_id(id).await? {
            Some(post) => post,
            None => return Ok(None),
        };

        let images = self.images_for_post(id).await?;

        Ok(Some(PostWithImages { post, images }))
    }

    async fn fetch_page(
        &self,
        limit: u32,
        after: Option<Uuid>,
    ) -> Result<Vec<PostWithImages>, DomainError> {
        // Resolve the cursor post to its (created_at, id) position first
        let cursor = match after {
            Some(after_id) => {
                let query = "SELECT created_at, id FROM posts WHERE id = ? LIMIT 1";
                let row = sqlx::query(query)
                    .bind(after_id.to_string())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| DomainError::Database {
                        message: format!("Failed to resolve feed cursor: {}", e),
                    })?
                    .ok_or_else(|| DomainError::validation("Unknown feed cursor"))?;

                let created_at: DateTime<Utc> =
                    row.try_get("created_at").map_err(|e| DomainError::Database {
                        message: format!("Failed to get created_at: {}", e),
                    })?;
                let id: String = row.try_get("id").map_err(|e| DomainError::Database {
                    message: format!("Failed to get id: {}", e),
                })?;

                Some((created_at, id))
            }
            None => None,
        };

        let rows = match cursor {
            Some((created_at, id)) => {
                let query = format!(
                    r#"
                    SELECT {}
                    FROM posts
                    WHERE created_at < ? OR (created_at = ? AND id < ?)
                    ORDER BY created_at DESC, id DESC
                    LIMIT ?
                    "#,
                    POST_COLUMNS
                );

                sqlx::query(&query)
                    .bind(created_at)
                    .bind(created_at)
                    .bind(id)
                    .bind(limit as i64)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {} FROM posts ORDER BY created_at DESC, id DESC LIMIT ?",
                    POST_COLUMNS
                );

                sqlx::query(&query)
                    .bind(limit as i64)
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|e| DomainError::Database {
            message: format!("Failed to fetch feed page: {}", e),
        })?;

        let mut posts = Vec::with_capacity(rows.len());
        for row in rows {
            posts.push(Self::row_to_post(&row)?);
        }

        let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let mut images = self.load_images_for(&post_ids).await?;

        Ok(posts
            .into_iter()
            .map(|post| {
                let images = images.remove(&post.id).unwrap_or_default();
                PostWithImages { post, images }
            })
            .collect())
    }

    async fn update_with_images(
        &self,
        post: &Post,
        new_images: Vec<PostImage>,
    ) -> Result<PostWithImages, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Database {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        let post_query = r#"
            UPDATE posts SET
                title = ?,
                description = ?,
                latitude = ?,
                longitude = ?,
                updated_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(post_query)
            .bind(&post.title)
            .bind(&post.description)
            .bind(post.location.map(|c| c.latitude))
            .bind(post.location.map(|c| c.longitude))
            .bind(post.updated_at)
            .bind(post.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to update post: {}", e),
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: "Post".to_string(),
            });
        }

        let image_query = r#"
            INSERT INTO post_images (
                id, post_id, file_path, url, created_at
            ) VALUES (?, ?, ?, ?, ?)
        "#;

        for image in &new_images {
            sqlx::query(image_query)
                .bind(image.id.to_string())
                .bind(image.post_id.to_string())
                .bind(&image.file_path)
                .bind(&image.url)
                .bind(image.created_at)
                .execute(&mut *tx)
                .await
                .map_err(|e| DomainError::Database {
                    message: format!("Failed to attach post image: {}", e),
                })?;
        }

        tx.commit().await.map_err(|e| DomainError::Database {
            message: format!("Failed to commit post update: {}", e),
        })?;

        self.find_with_images(post.id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post"))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        // Image rows go with the post via ON DELETE CASCADE
        let query = "DELETE FROM posts WHERE id = ?";

        let result = sqlx::query(query)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to delete post: {}", e),
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn images_for_post(&self, post_id: Uuid) -> Result<Vec<PostImage>, DomainError> {
        let query = format!(
            "SELECT {} FROM post_images WHERE post_id = ? ORDER BY created_at ASC, id ASC",
            IMAGE_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(post_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to load post images: {}", e),
            })?;

        let mut images = Vec::with_capacity(rows.len());
        for row in rows {
            images.push(Self::row_to_image(&row)?);
        }

        Ok(images)
    }

    async fn images_by_urls(&self, urls: &[String]) -> Result<Vec<PostImage>, DomainError> {
        if urls.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; urls.len()].join(", ");
        let query = format!(
            "SELECT {} FROM post_images WHERE url IN ({})",
            IMAGE_COLUMNS, placeholders
        );

        let mut statement = sqlx::query(&query);
        for url in urls {
            statement = statement.bind(url);
        }

        let rows = statement
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to find images by url: {}", e),
            })?;

        let mut images = Vec::with_capacity(rows.len());
        for row in rows {
            images.push(Self::row_to_image(&row)?);
        }

        Ok(images)
    }

    async fn delete_images_by_urls(&self, urls: &[String]) -> Result<u64, DomainError> {
        if urls.is_empty() {
            return Ok(0);
        }

        let placeholders = vec!["?"; urls.len()].join(", ");
        let query = format!("DELETE FROM post_images WHERE url IN ({})", placeholders);

        let mut statement = sqlx::query(&query);
        for url in urls {
            statement = statement.bind(url);
        }

        let result = statement
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to delete images: {}", e),
            })?;

        Ok(result.rows_affected())
    }

    async fn count_images(&self, post_id: Uuid) -> Result<u64, DomainError> {
        let query = "SELECT COUNT(*) as image_count FROM post_images WHERE post_id = ?";

        let row = sqlx::query(query)
            .bind(post_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to count images: {}", e),
            })?;

        let count: i64 = row
            .try_get("image_count")
            .map_err(|e| DomainError::Database {
                message: format!("Failed to get count: {}", e),
            })?;

        Ok(count as u64)
    }
}
