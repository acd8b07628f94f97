//! Signed URL resolution for read paths.

use std::sync::Arc;
use std::time::Duration;

use tubely_core::models::{StorageReference, VideoRecord};
use tubely_core::validation::validate_storage_reference;
use tubely_core::AppError;
use tubely_storage::Storage;

/// Swaps persisted `"<bucket>,<key>"` references for time-bounded signed URLs.
///
/// Only the returned copy changes; the stored record keeps its references.
#[derive(Clone)]
pub struct PresignedUrlResolver {
    storage: Arc<dyn Storage>,
    ttl: Duration,
}

impl PresignedUrlResolver {
    pub fn new(storage: Arc<dyn Storage>, ttl: Duration) -> Self {
        Self { storage, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn sign(&self, reference: &StorageReference) -> Result<String, AppError> {
        let url = self
            .storage
            .presign_get(reference.bucket(), reference.key(), self.ttl)
            .await?;
        Ok(url)
    }

    /// Resolve both the video and thumbnail references of a record.
    pub async fn resolve(&self, mut video: VideoRecord) -> Result<VideoRecord, AppError> {
        video.video_url = self.resolve_reference(video.video_url.take()).await?;
        video.thumbnail_url = self.resolve_reference(video.thumbnail_url.take()).await?;
        Ok(video)
    }

    pub async fn resolve_all(&self, videos: Vec<VideoRecord>) -> Result<Vec<VideoRecord>, AppError> {
        let mut resolved = Vec::with_capacity(videos.len());
        for video in videos {
            resolved.push(self.resolve(video).await?);
        }
        Ok(resolved)
    }

    async fn resolve_reference(&self, value: Option<String>) -> Result<Option<String>, AppError> {
        let Some(raw) = value else {
            return Ok(None);
        };

        match validate_storage_reference(&raw)? {
            Some(reference) => Ok(Some(self.sign(&reference).await?)),
            None => Ok(Some(raw)),
        }
    }
}
