//! File upload configuration

use serde::{Deserialize, Serialize};

/// Upload handling configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    /// Directory uploaded files are written to
    pub dir: String,

    /// Public path prefix stored in image urls, e.g. "uploads"
    pub public_prefix: String,

    /// Maximum accepted size for a single file in bytes
    pub max_file_bytes: usize,

    /// Maximum number of images attached to one post
    pub max_images_per_post: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: String::from("uploads"),
            public_prefix: String::from("uploads"),
            max_file_bytes: 5 * 1024 * 1024, // 5 MiB
            max_images_per_post: 6,
        }
    }
}

impl UploadConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());
        let max_file_bytes = std::env::var("UPLOAD_MAX_FILE_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5 * 1024 * 1024);
        let max_images_per_post = std::env::var("UPLOAD_MAX_IMAGES_PER_POST")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(6);

        Self {
            public_prefix: dir.trim_matches('/').to_string(),
            dir,
            max_file_bytes,
            max_images_per_post,
        }
    }

    /// Public url for a stored filename, e.g. `uploads/abc.jpg`
    pub fn public_url(&self, filename: &str) -> String {
        format!("{}/{}", self.public_prefix, filename)
    }
}
