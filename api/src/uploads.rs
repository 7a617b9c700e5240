//! Disk-backed storage for uploaded images.
//!
//! Multipart image fields are streamed straight to the upload directory
//! under a random name. Database rows keep both the on-disk path and the
//! public url, so handlers can unlink files after a successful commit and
//! never before.

use std::path::{Path, PathBuf};

use actix_multipart::Field;
use futures_util::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::warn;
use uuid::Uuid;

use tn_shared::config::UploadConfig;

/// Errors surfaced while receiving or storing an uploaded file
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The file exceeded the configured per-file size limit
    #[error("File exceeds the limit of {limit} bytes")]
    TooLarge { limit: usize },

    /// The field did not carry an `image/*` content type
    #[error("Only image uploads are accepted")]
    NotAnImage,

    /// The multipart stream broke mid-transfer
    #[error("Upload stream failed: {0}")]
    Stream(String),

    /// Writing to the upload directory failed
    #[error("File storage failed")]
    Io(#[from] std::io::Error),
}

/// A file persisted to the upload directory
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// On-disk path, kept server-side
    pub file_path: String,
    /// Public url served to clients
    pub url: String,
}

/// Streams multipart fields to the upload directory
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    config: UploadConfig,
}

impl UploadStore {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            dir: PathBuf::from(&config.dir),
            config: config.clone(),
        }
    }

    /// Maximum number of images attached to one post
    pub fn max_images_per_post(&self) -> usize {
        self.config.max_images_per_post
    }

    /// Creates the upload directory if it does not exist yet
    pub fn ensure_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)
    }

    /// Streams one image field to a freshly named file
    ///
    /// The stored name is a random uuid plus the sanitized extension of the
    /// client filename; client-supplied path components never reach the
    /// filesystem. Partial files are unlinked when the transfer fails or
    /// grows past the size limit.
    pub async fn save_field(&self, field: &mut Field) -> Result<StoredFile, UploadError> {
        let is_image = field
            .content_type()
            .map(|mime| mime.type_().as_str() == "image")
            .unwrap_or(false);
        if !is_image {
            return Err(UploadError::NotAnImage);
        }

        let extension = field
            .content_disposition()
            .get_filename()
            .and_then(sanitized_extension);

        let mut filename = Uuid::new_v4().to_string();
        if let Some(extension) = extension {
            filename.push('.');
            filename.push_str(&extension);
        }

        let path = self.dir.join(&filename);
        let mut file = fs::File::create(&path).await?;

        let mut written: usize = 0;
        while let Some(chunk) = field.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(source) => {
                    self.discard(&path).await;
                    return Err(UploadError::Stream(source.to_string()));
                }
            };
            written += chunk.len();
            if written > self.config.max_file_bytes {
                self.discard(&path).await;
                return Err(UploadError::TooLarge {
                    limit: self.config.max_file_bytes,
                });
            }
            if let Err(source) = file.write_all(&chunk).await {
                self.discard(&path).await;
                return Err(UploadError::Io(source));
            }
        }
        file.flush().await?;

        Ok(StoredFile {
            file_path: path.to_string_lossy().into_owned(),
            url: self.config.public_url(&filename),
        })
    }

    /// Deletes a stored file, logging instead of failing
    ///
    /// Removal runs after the database has committed, so a leftover file
    /// only costs disk space and never an inconsistent response.
    pub async fn remove(&self, file_path: &str) {
        if let Err(source) = fs::remove_file(file_path).await {
            if source.kind() != std::io::ErrorKind::NotFound {
                warn!(file_path, error = %source, "Failed to remove stored file");
            }
        }
    }

    /// Removes a batch of stored files
    pub async fn remove_all<I, S>(&self, file_paths: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for file_path in file_paths {
            self.remove(file_path.as_ref()).await;
        }
    }

    async fn discard(&self, path: &Path) {
        if let Err(source) = fs::remove_file(path).await {
            warn!(path = %path.display(), error = %source, "Failed to discard partial upload");
        }
    }
}

/// Reads a text field fully into a string
pub async fn read_text_field(field: &mut Field) -> Result<String, UploadError> {
    let mut buffer = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|source| UploadError::Stream(source.to_string()))?;
        buffer.extend_from_slice(&chunk);
    }
    String::from_utf8(buffer)
        .map_err(|_| UploadError::Stream("field is not valid utf-8".to_string()))
}

fn sanitized_extension(filename: &str) -> Option<String> {
    let extension = Path::new(filename).extension()?.to_str()?;
    let clean: String = extension
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(8)
        .collect::<String>()
        .to_ascii_lowercase();
    if clean.is_empty() {
        None
    } else {
        Some(clean)
    }
}
