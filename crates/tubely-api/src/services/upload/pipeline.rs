use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tokio::io::AsyncRead;
use tubely_core::constants::THUMBNAIL_PREFIX;
use tubely_core::models::{StorageReference, VideoRecord, VideoResponse, VideoUploadResponse};
use tubely_core::validation::{
    media_type_to_extension, validate_thumbnail_content_type, validate_video_content_type,
};
use tubely_core::{AppError, AssetConfig};
use tubely_db::VideoStore;
use tubely_processing::{
    derive_asset_key, derive_key, FastStartTranscoder, MediaInspector, StagedUpload,
};
use tubely_storage::{ObjectReader, Storage};
use uuid::Uuid;

use crate::constants::VIDEO_UPLOADED_MESSAGE;
use crate::services::{AccessValidator, PresignedUrlResolver};
use crate::utils::upload::staging_error;

/// A file part taken from the request, not yet read.
pub struct IncomingUpload<R> {
    pub declared_content_type: Option<String>,
    pub reader: R,
}

#[derive(Clone, Debug)]
pub struct PipelineSettings {
    pub assets: AssetConfig,
    pub staging_dir: PathBuf,
    pub max_video_bytes: u64,
    pub max_thumbnail_bytes: u64,
    /// Delete the stored object when the record update that should reference it fails.
    pub compensate_orphans: bool,
}

/// Orchestrates an upload once the caller is known: validate, stage, inspect, remux,
/// store, then record the storage reference.
///
/// Staged and derived files are owned by guards local to each call, so every early
/// return (including request cancellation) removes them.
pub struct UploadPipeline {
    access: AccessValidator,
    videos: Arc<dyn VideoStore>,
    storage: Arc<dyn Storage>,
    inspector: MediaInspector,
    transcoder: FastStartTranscoder,
    resolver: Arc<PresignedUrlResolver>,
    settings: PipelineSettings,
}

impl UploadPipeline {
    pub fn new(
        videos: Arc<dyn VideoStore>,
        storage: Arc<dyn Storage>,
        inspector: MediaInspector,
        transcoder: FastStartTranscoder,
        resolver: Arc<PresignedUrlResolver>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            access: AccessValidator::new(videos.clone()),
            videos,
            storage,
            inspector,
            transcoder,
            resolver,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Ownership gate; must pass before any byte of the body is read.
    pub async fn authorize(&self, video_id: Uuid, user_id: Uuid) -> Result<VideoRecord, AppError> {
        self.access.authorize(video_id, user_id).await
    }

    #[tracing::instrument(skip(self, video, upload), fields(video_id = %video.id, user_id = %video.user_id))]
    pub async fn ingest_video<R>(
        &self,
        mut video: VideoRecord,
        mut upload: IncomingUpload<R>,
    ) -> Result<VideoUploadResponse, AppError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let start = std::time::Instant::now();
        let media_type = validate_video_content_type(upload.declared_content_type.as_deref())?;
        let extension = media_type_to_extension(media_type);

        let staged = StagedUpload::stage(
            &mut upload.reader,
            &self.settings.staging_dir,
            &extension,
            media_type,
            self.settings.max_video_bytes,
        )
        .await
        .map_err(staging_error)?;

        let classification = self.inspector.classify(staged.path()).await?;
        let processed = self.transcoder.rewrite_for_streaming(staged.path()).await?;

        let key = derive_key(classification, &extension);
        let size = processed.size().await?;
        let file = processed.open().await?;
        let bucket = self.settings.assets.bucket.as_str();

        self.storage
            .put_object(bucket, &key, Box::pin(file) as ObjectReader, Some(size), media_type)
            .await?;

        let reference = StorageReference::new(bucket, key.as_str())?;
        video.video_url = Some(reference.to_string());
        self.persist(&mut video, &reference).await?;

        let resolved = self.resolver.resolve(video).await?;
        let video_url = resolved.video_url.clone().ok_or_else(|| {
            AppError::Internal("Resolved video has no URL after upload".to_string())
        })?;

        tracing::info!(
            classification = %classification,
            bucket = %bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_millis() as u64,
            "Video upload completed"
        );

        Ok(VideoUploadResponse {
            video_id: resolved.id,
            video_url,
            cdn_url: self.settings.assets.cdn_url(&key),
            message: VIDEO_UPLOADED_MESSAGE.to_string(),
            video: resolved.into(),
        })
    }

    #[tracing::instrument(skip(self, video, upload), fields(video_id = %video.id, user_id = %video.user_id))]
    pub async fn ingest_thumbnail<R>(
        &self,
        mut video: VideoRecord,
        mut upload: IncomingUpload<R>,
    ) -> Result<VideoResponse, AppError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let media_type = validate_thumbnail_content_type(upload.declared_content_type.as_deref())?;
        let extension = media_type_to_extension(media_type);

        let staged = StagedUpload::stage(
            &mut upload.reader,
            &self.settings.staging_dir,
            &extension,
            media_type,
            self.settings.max_thumbnail_bytes,
        )
        .await
        .map_err(staging_error)?;

        let key = derive_asset_key(THUMBNAIL_PREFIX, &extension);
        let bucket = self.settings.assets.bucket.as_str();
        let file = staged.open().await?;

        self.storage
            .put_object(
                bucket,
                &key,
                Box::pin(file) as ObjectReader,
                Some(staged.size()),
                staged.media_type(),
            )
            .await?;

        let reference = StorageReference::new(bucket, key.as_str())?;
        video.thumbnail_url = Some(reference.to_string());
        self.persist(&mut video, &reference).await?;

        tracing::info!(bucket = %bucket, key = %key, size_bytes = staged.size(), "Thumbnail upload completed");

        Ok(self.resolver.resolve(video).await?.into())
    }

    /// Record the new reference. The object is already stored, so a failure here leaves
    /// it unreferenced; that is always logged and optionally undone.
    async fn persist(
        &self,
        video: &mut VideoRecord,
        reference: &StorageReference,
    ) -> Result<(), AppError> {
        video.updated_at = Utc::now();

        let Err(err) = self.videos.update_video(video).await else {
            return Ok(());
        };

        tracing::error!(
            orphaned_object = true,
            bucket = %reference.bucket(),
            key = %reference.key(),
            video_id = %video.id,
            error = %err.detailed_message(),
            "Stored object is not referenced by any video"
        );

        if self.settings.compensate_orphans {
            match self
                .storage
                .delete_object(reference.bucket(), reference.key())
                .await
            {
                Ok(()) => tracing::info!(
                    bucket = %reference.bucket(),
                    key = %reference.key(),
                    "Deleted orphaned object"
                ),
                Err(e) => tracing::warn!(
                    bucket = %reference.bucket(),
                    key = %reference.key(),
                    error = %e,
                    "Failed to delete orphaned object"
                ),
            }
        }

        Err(AppError::Persistence(format!(
            "Failed to record upload for video {}: {}",
            video.id, err
        )))
    }
}
