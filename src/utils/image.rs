// src/utils/image.rs

use std::path::Path;

use image::ImageFormat;
use uuid::Uuid;

use crate::error::AppError;

pub const EMPTY_FILE: &str = "The submitted file is empty.";
pub const INVALID_IMAGE: &str = "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

/// Sub-directory of the media root holding post images.
const UPLOAD_DIR: &str = "posts";

const ACCEPTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Bmp,
];

/// An upload that decoded successfully.
#[derive(Debug, Clone)]
pub struct ValidImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
}

/// Sniffs the format and fully decodes the bytes; a readable header alone is
/// not enough. Errors are the messages shown next to the form field.
pub fn validate_image(bytes: &[u8]) -> Result<ImageFormat, &'static str> {
    if bytes.is_empty() {
        return Err(EMPTY_FILE);
    }

    let format = image::guess_format(bytes).map_err(|_| INVALID_IMAGE)?;
    if !ACCEPTED_FORMATS.contains(&format) {
        return Err(INVALID_IMAGE);
    }

    image::load_from_memory_with_format(bytes, format).map_err(|_| INVALID_IMAGE)?;
    Ok(format)
}

/// Writes the image under `media_root` with a fresh name and returns the
/// path relative to `media_root`.
pub async fn save_image(media_root: &Path, image: &ValidImage) -> Result<String, AppError> {
    let extension = image
        .format
        .extensions_str()
        .first()
        .copied()
        .unwrap_or("img");
    let relative = format!("{}/{}.{}", UPLOAD_DIR, Uuid::new_v4().simple(), extension);

    tokio::fs::create_dir_all(media_root.join(UPLOAD_DIR)).await?;
    tokio::fs::write(media_root.join(&relative), &image.bytes).await?;

    tracing::debug!("Stored upload at {}", relative);
    Ok(relative)
}
