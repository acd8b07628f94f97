//! Repository trait for video records

use async_trait::async_trait;
use tubely_core::models::VideoRecord;
use tubely_core::AppError;
use uuid::Uuid;

/// Video persistence operations needed by the API.
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Get a video by ID
    async fn get_video(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError>;

    /// Save a video's mutable fields. The owning user is never changed.
    /// Fails with `NotFound` when no row has the record's ID.
    async fn update_video(&self, video: &VideoRecord) -> Result<(), AppError>;

    /// Videos owned by a user, newest first
    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<VideoRecord>, AppError>;

    /// Check that the backing store is reachable
    async fn health_check(&self) -> Result<(), AppError>;
}
