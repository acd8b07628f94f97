//! Path extractors

use crate::error::HttpAppError;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use tubely_core::validation::parse_video_id;
use tubely_core::AppError;
use uuid::Uuid;

/// The `{video_id}` route parameter, validated as a UUID.
///
/// Runs ahead of authentication so a malformed ID is a 400 regardless of credentials.
#[derive(Debug, Clone, Copy)]
pub struct VideoIdPath(pub Uuid);

impl<S> FromRequestParts<S> for VideoIdPath
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::InvalidInput(format!("Missing video ID: {}", e.body_text())))?;

        Ok(VideoIdPath(parse_video_id(&raw)?))
    }
}
