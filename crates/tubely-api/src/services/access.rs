use std::sync::Arc;

use tubely_core::models::VideoRecord;
use tubely_core::AppError;
use tubely_db::VideoStore;
use uuid::Uuid;

/// Ownership check run before any upload byte is staged.
#[derive(Clone)]
pub struct AccessValidator {
    videos: Arc<dyn VideoStore>,
}

impl AccessValidator {
    pub fn new(videos: Arc<dyn VideoStore>) -> Self {
        Self { videos }
    }

    /// Load the video and confirm `user_id` owns it.
    #[tracing::instrument(skip(self), fields(video_id = %video_id, user_id = %user_id))]
    pub async fn authorize(&self, video_id: Uuid, user_id: Uuid) -> Result<VideoRecord, AppError> {
        let video = self
            .videos
            .get_video(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

        if !video.is_owned_by(user_id) {
            tracing::warn!(owner_id = %video.user_id, "Rejected access to another user's video");
            return Err(AppError::Unauthorized(
                "You are not the owner of this video".to_string(),
            ));
        }

        Ok(video)
    }
}
