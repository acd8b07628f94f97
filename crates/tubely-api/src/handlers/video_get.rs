use crate::auth::AuthenticatedUser;
use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::extract::VideoIdPath;
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use tubely_core::models::VideoResponse;

#[tracing::instrument(
    skip_all,
    fields(video_id = %video_id, user_id = %user.user_id, operation = "get_video")
)]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    VideoIdPath(video_id): VideoIdPath,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, HttpAppError> {
    let video = state.pipeline.authorize(video_id, user.user_id).await?;
    let video = state.resolver.resolve(video).await?;

    Ok(Json(VideoResponse::from(video)))
}

#[tracing::instrument(skip_all, fields(user_id = %user.user_id, operation = "list_videos"))]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, HttpAppError> {
    let videos = state.videos.list_videos_for_user(user.user_id).await?;
    let videos = state.resolver.resolve_all(videos).await?;

    let response: Vec<VideoResponse> = videos.into_iter().map(VideoResponse::from).collect();
    Ok(Json(response))
}
