use anyhow::anyhow;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{AppError, AppResult};

pub const PROFILE_IMAGE_KB_LIMIT: usize = 128;
pub const COVER_IMAGE_KB_LIMIT: usize = 1024;

/// Decoded size in bytes of an image sent as a base64 data url
/// (`data:image/png;base64,...`) or as bare base64.
pub fn decoded_image_size(image: &str) -> AppResult<usize> {
    let payload = match image.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => image,
    };

    STANDARD
        .decode(payload.trim())
        .map(|bytes| bytes.len())
        .map_err(|_| AppError::BadRequest(anyhow!("Image data is not valid base64.")))
}

/// Fails with a client error when `image` decodes to more than `limit_kb` kilobytes.
pub fn ensure_image_size(image: Option<&str>, limit_kb: usize, label: &str) -> AppResult<()> {
    let Some(image) = image else {
        return Ok(());
    };

    if decoded_image_size(image)? > limit_kb * 1024 {
        return Err(AppError::BadRequest(anyhow!(
            "{} image size should be less than {}kb.",
            label,
            limit_kb
        )));
    }
    Ok(())
}
