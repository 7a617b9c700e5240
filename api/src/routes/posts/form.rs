//! Shared multipart parsing for the post create and update handlers.
//!
//! Both handlers accept the same form: text parts `title`, `description`,
//! `latitude`, `longitude` and up to the configured number of image parts
//! named `images`. Files are written to disk while parsing; every early
//! return cleans up what was already stored.

use actix_multipart::Multipart;
use actix_web::HttpResponse;
use futures_util::StreamExt;

use crate::handlers::{handle_domain_error, handle_upload_error};
use crate::uploads::{read_text_field, StoredFile, UploadError, UploadStore};

use tn_core::errors::DomainError;
use tn_core::services::post::NewPostImage;
use tn_shared::types::Coordinate;

/// Parsed post form with its stored image files
pub struct PostForm {
    pub title: Option<String>,
    pub description: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,
    pub images: Vec<StoredFile>,
}

impl PostForm {
    /// Combines the latitude and longitude parts into a coordinate
    ///
    /// Both or neither must be present; values must parse as decimals.
    /// Range checking stays with the domain service.
    pub fn location(&self) -> Result<Option<Coordinate>, DomainError> {
        match (&self.latitude, &self.longitude) {
            (None, None) => Ok(None),
            (Some(latitude), Some(longitude)) => {
                let latitude = latitude.trim().parse::<f64>().map_err(|_| {
                    DomainError::validation("latitude must be a decimal number")
                })?;
                let longitude = longitude.trim().parse::<f64>().map_err(|_| {
                    DomainError::validation("longitude must be a decimal number")
                })?;
                Ok(Some(Coordinate::new(latitude, longitude)))
            }
            _ => Err(DomainError::validation(
                "latitude and longitude must be supplied together",
            )),
        }
    }

    /// On-disk paths of the stored files, for cleanup after a failure
    pub fn file_paths(&self) -> Vec<String> {
        self.images
            .iter()
            .map(|stored| stored.file_path.clone())
            .collect()
    }

    /// The stored files as image records for the domain service
    pub fn new_images(&self) -> Vec<NewPostImage> {
        self.images
            .iter()
            .map(|stored| NewPostImage {
                file_path: stored.file_path.clone(),
                url: stored.url.clone(),
            })
            .collect()
    }

    /// Unlinks every stored file
    pub async fn discard(self, uploads: &UploadStore) {
        for stored in &self.images {
            uploads.remove(&stored.file_path).await;
        }
    }
}

/// Reads the whole multipart payload into a [`PostForm`]
///
/// On failure the already stored files are unlinked and the ready error
/// response is returned.
pub async fn collect_post_form(
    payload: &mut Multipart,
    uploads: &UploadStore,
) -> Result<PostForm, HttpResponse> {
    let mut form = PostForm {
        title: None,
        description: None,
        latitude: None,
        longitude: None,
        images: Vec::new(),
    };

    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(field) => field,
            Err(source) => {
                let error = UploadError::Stream(source.to_string());
                form.discard(uploads).await;
                return Err(handle_upload_error(error));
            }
        };

        let name = field
            .content_disposition()
            .get_name()
            .unwrap_or_default()
            .to_string();

        let result = match name.as_str() {
            "title" => read_text_field(&mut field)
                .await
                .map(|value| form.title = Some(value)),
            "description" => read_text_field(&mut field)
                .await
                .map(|value| form.description = Some(value)),
            "latitude" => read_text_field(&mut field)
                .await
                .map(|value| form.latitude = Some(value)),
            "longitude" => read_text_field(&mut field)
                .await
                .map(|value| form.longitude = Some(value)),
            "images" => {
                if form.images.len() >= uploads.max_images_per_post() {
                    let error = DomainError::BusinessRule {
                        message: format!(
                            "A post can carry at most {} images",
                            uploads.max_images_per_post()
                        ),
                    };
                    form.discard(uploads).await;
                    return Err(handle_domain_error(error));
                }
                uploads
                    .save_field(&mut field)
                    .await
                    .map(|stored| form.images.push(stored))
            }
            // Unknown parts are drained and dropped by the multipart stream
            _ => Ok(()),
        };

        if let Err(error) = result {
            form.discard(uploads).await;
            return Err(handle_upload_error(error));
        }
    }

    Ok(form)
}
