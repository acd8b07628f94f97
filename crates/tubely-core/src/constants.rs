//! Shared constants: upload limits, accepted media types and storage key layout.

/// Hard ceiling for a video upload body (1 GiB).
pub const MAX_VIDEO_UPLOAD_SIZE: usize = 1 << 30;

/// Hard ceiling for a thumbnail upload body (10 MiB).
pub const MAX_THUMBNAIL_SIZE: usize = 10 << 20;

pub const VIDEO_MP4_TYPE: &str = "video/mp4";
pub const IMAGE_JPEG_TYPE: &str = "image/jpeg";
pub const IMAGE_PNG_TYPE: &str = "image/png";

/// Extensions include the leading dot.
pub const MP4_EXTENSION: &str = ".mp4";
pub const JPEG_EXTENSION: &str = ".jpg";
pub const PNG_EXTENSION: &str = ".png";

/// Multipart field carrying the video file.
pub const VIDEO_FORM_FIELD: &str = "video";
/// Multipart field carrying the thumbnail image.
pub const THUMBNAIL_FORM_FIELD: &str = "thumbnail";

pub const LANDSCAPE_PREFIX: &str = "landscape";
pub const PORTRAIT_PREFIX: &str = "portrait";
pub const OTHER_PREFIX: &str = "other";
pub const THUMBNAIL_PREFIX: &str = "thumbnails";

pub const ASPECT_RATIO_16X9: &str = "16:9";
pub const ASPECT_RATIO_9X16: &str = "9:16";

/// Random bytes behind every generated asset name.
pub const ASSET_NAME_BYTES: usize = 32;

/// Default lifetime of a presigned GET URL.
pub const DEFAULT_PRESIGN_TTL_SECS: u64 = 15 * 60;

/// Name prefix for request-scoped staging files.
pub const STAGING_FILE_PREFIX: &str = "tubely-upload";

/// Suffix appended to a staged file for its fast-start derivative.
pub const FAST_START_SUFFIX: &str = ".processing";

/// Separator of the persisted `"<bucket>,<key>"` reference.
pub const STORAGE_REFERENCE_SEPARATOR: char = ',';
