use crate::auth::AuthenticatedUser;
use crate::error::HttpAppError;
use crate::services::IncomingUpload;
use crate::state::AppState;
use crate::utils::extract::VideoIdPath;
use crate::utils::upload::{field_reader, multipart_error, multipart_from_request};
use axum::{
    extract::{Request, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tubely_core::AppError;
use tubely_core::constants::VIDEO_FORM_FIELD;

/// Replace a video's media with the MP4 in the `video` form field.
///
/// Extractors run in argument order: the path ID is checked, then the bearer token.
/// Ownership is confirmed before the multipart body is opened.
#[tracing::instrument(
    skip_all,
    fields(video_id = %video_id, user_id = %user.user_id, operation = "upload_video")
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    VideoIdPath(video_id): VideoIdPath,
    user: AuthenticatedUser,
    request: Request,
) -> Result<impl IntoResponse, HttpAppError> {
    let video = state.pipeline.authorize(video_id, user.user_id).await?;

    let mut multipart = multipart_from_request(request).await?;
    let field = loop {
        match multipart.next_field().await.map_err(multipart_error)? {
            Some(field) if field.name() == Some(VIDEO_FORM_FIELD) => break field,
            Some(_) => continue,
            None => {
                return Err(AppError::InvalidInput(format!(
                    "No file provided in field '{}'",
                    VIDEO_FORM_FIELD
                ))
                .into())
            }
        }
    };
    let upload = IncomingUpload {
        declared_content_type: field.content_type().map(String::from),
        reader: field_reader(field),
    };

    let response = state.pipeline.ingest_video(video, upload).await?;

    Ok(Json(response))
}
