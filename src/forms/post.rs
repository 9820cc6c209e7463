// src/forms/post.rs

use axum::extract::Multipart;
use serde::Serialize;
use sqlx::SqlitePool;
use validator::Validate;

use super::{FormErrors, not_blank};
use crate::{
    error::AppError,
    models::{group::Group, post::PostView},
    utils::image::{ValidImage, validate_image},
};

pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

/// A file part as received, before it is checked.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Post submission: `text` is required, `group` is an optional group id and
/// `image` an optional upload that must decode as an image.
#[derive(Debug, Default, Serialize, Validate)]
pub struct PostForm {
    #[validate(custom(function = not_blank))]
    pub text: String,

    /// Raw value of the group choice; empty means no group.
    pub group: Option<String>,

    #[serde(skip)]
    pub image: Option<ImageUpload>,

    pub errors: FormErrors,
}

/// What a valid `PostForm` turns into.
#[derive(Debug)]
pub struct CleanedPost {
    pub text: String,
    pub group_id: Option<i64>,
    pub image: Option<ValidImage>,
}

impl PostForm {
    /// Pre-filled form for editing an existing post.
    pub fn from_post(post: &PostView) -> Self {
        Self {
            text: post.text.clone(),
            group: post.group_id.map(|id| id.to_string()),
            ..Self::default()
        }
    }

    /// Reads the `multipart/form-data` body. Unknown parts are ignored.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = PostForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "text" => form.text = field.text().await?,
                "group" => {
                    let value = field.text().await?;
                    let value = value.trim();
                    form.group = (!value.is_empty()).then(|| value.to_string());
                }
                "image" => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await?;
                    // Browsers send an empty nameless part when no file was chosen.
                    if !(filename.is_empty() && bytes.is_empty()) {
                        form.image = Some(ImageUpload {
                            filename,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }

    /// Runs every field rule. On failure the errors are kept on the form for
    /// redisplay and `None` is returned. The upload is consumed either way.
    pub async fn clean(&mut self, pool: &SqlitePool) -> Result<Option<CleanedPost>, AppError> {
        let mut errors = match self.validate() {
            Ok(()) => FormErrors::default(),
            Err(e) => FormErrors::from(e),
        };

        let mut group_id = None;
        if let Some(raw) = &self.group {
            let group = match raw.parse::<i64>() {
                Ok(id) => Group::find_by_id(pool, id).await?,
                Err(_) => None,
            };
            match group {
                Some(group) => group_id = Some(group.id),
                None => errors.add("group", INVALID_CHOICE),
            }
        }

        let mut image = None;
        if let Some(ImageUpload { filename, bytes }) = self.image.take() {
            // Decoding a large upload is CPU-bound; keep it off the async workers.
            let checked = tokio::task::spawn_blocking(move || {
                validate_image(&bytes).map(|format| ValidImage { bytes, format })
            })
            .await
            .map_err(|e| AppError::InternalServerError(format!("image check failed: {}", e)))?;

            match checked {
                Ok(valid) => image = Some(valid),
                Err(message) => {
                    tracing::debug!(filename = %filename, "Rejected upload: {}", message);
                    errors.add("image", message);
                }
            }
        }

        if !errors.is_empty() {
            self.errors = errors;
            return Ok(None);
        }

        Ok(Some(CleanedPost {
            text: self.text.trim().to_string(),
            group_id,
            image,
        }))
    }
}
