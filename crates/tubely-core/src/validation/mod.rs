//! Request validators shared by the upload and read paths.

use uuid::Uuid;

use crate::constants::{
    IMAGE_JPEG_TYPE, IMAGE_PNG_TYPE, JPEG_EXTENSION, MP4_EXTENSION, PNG_EXTENSION, VIDEO_MP4_TYPE,
};
use crate::error::AppError;
use crate::models::StorageReference;

/// Parse a video identifier taken from the request path.
pub fn parse_video_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::InvalidInput(format!("Invalid video ID: {}", raw)))
}

/// Strip parameters (`; charset=...`) and lowercase a declared media type.
pub fn normalize_media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_lowercase()
}

/// File extension (with leading dot) for a media type.
///
/// Accepted upload types map to their canonical extension, other well-formed
/// `type/subtype` values to `.<subtype>`, and anything else to `.bin`.
pub fn media_type_to_extension(media_type: &str) -> String {
    let normalized = normalize_media_type(media_type);
    match normalized.as_str() {
        VIDEO_MP4_TYPE => MP4_EXTENSION.to_string(),
        IMAGE_JPEG_TYPE => JPEG_EXTENSION.to_string(),
        IMAGE_PNG_TYPE => PNG_EXTENSION.to_string(),
        other => match other.split_once('/') {
            Some((kind, subtype))
                if !kind.is_empty() && !subtype.is_empty() && !subtype.contains('/') =>
            {
                format!(".{}", subtype)
            }
            _ => ".bin".to_string(),
        },
    }
}

/// Only `video/mp4` is accepted. Returns the canonical media type.
pub fn validate_video_content_type(content_type: Option<&str>) -> Result<&'static str, AppError> {
    let declared = content_type
        .ok_or_else(|| AppError::InvalidInput("Missing Content-Type for video".to_string()))?;

    if normalize_media_type(declared) != VIDEO_MP4_TYPE {
        return Err(AppError::InvalidInput(format!(
            "Invalid file type: {}. Only {} is allowed",
            declared, VIDEO_MP4_TYPE
        )));
    }

    Ok(VIDEO_MP4_TYPE)
}

/// Thumbnails may be JPEG or PNG. Returns the canonical media type.
pub fn validate_thumbnail_content_type(content_type: Option<&str>) -> Result<&'static str, AppError> {
    let declared = content_type
        .ok_or_else(|| AppError::InvalidInput("Missing Content-Type for thumbnail".to_string()))?;

    match normalize_media_type(declared).as_str() {
        IMAGE_JPEG_TYPE => Ok(IMAGE_JPEG_TYPE),
        IMAGE_PNG_TYPE => Ok(IMAGE_PNG_TYPE),
        _ => Err(AppError::InvalidInput(format!(
            "Invalid file type: {}. Allowed types: {}, {}",
            declared, IMAGE_JPEG_TYPE, IMAGE_PNG_TYPE
        ))),
    }
}

/// Validate a persisted `"<bucket>,<key>"` value. An empty value means "no reference".
pub fn validate_storage_reference(value: &str) -> Result<Option<StorageReference>, AppError> {
    if value.is_empty() {
        return Ok(None);
    }
    StorageReference::parse(value).map(Some)
}
