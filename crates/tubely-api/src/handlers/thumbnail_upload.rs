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
use tubely_core::constants::THUMBNAIL_FORM_FIELD;

#[tracing::instrument(
    skip_all,
    fields(video_id = %video_id, user_id = %user.user_id, operation = "upload_thumbnail")
)]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    VideoIdPath(video_id): VideoIdPath,
    user: AuthenticatedUser,
    request: Request,
) -> Result<impl IntoResponse, HttpAppError> {
    let video = state.pipeline.authorize(video_id, user.user_id).await?;

    let mut multipart = multipart_from_request(request).await?;
    let field = loop {
        match multipart.next_field().await.map_err(multipart_error)? {
            Some(field) if field.name() == Some(THUMBNAIL_FORM_FIELD) => break field,
            Some(_) => continue,
            None => {
                return Err(AppError::InvalidInput(format!(
                    "No file provided in field '{}'",
                    THUMBNAIL_FORM_FIELD
                ))
                .into())
            }
        }
    };
    let upload = IncomingUpload {
        declared_content_type: field.content_type().map(String::from),
        reader: field_reader(field),
    };

    let response = state.pipeline.ingest_thumbnail(video, upload).await?;

    Ok(Json(response))
}
