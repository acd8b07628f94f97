//! Service initialization and application state setup

use crate::auth::{CredentialVerifier, JwtVerifier};
use crate::services::{PipelineSettings, PresignedUrlResolver, UploadPipeline};
use crate::state::AppState;
use anyhow::{Context, Result};
use sqlx::PgPool;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::{VideoRepository, VideoStore};
use tubely_processing::{FastStartTranscoder, MediaInspector};
use tubely_storage::Storage;

/// Build the Postgres-backed state used by the server
pub async fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let videos: Arc<dyn VideoStore> = Arc::new(VideoRepository::new(pool));
    let verifier: Arc<dyn CredentialVerifier> = Arc::new(JwtVerifier::new(config.jwt_secret()));

    build_state(config, videos, storage, verifier)
}

/// Wire the upload pipeline and URL resolver around the given collaborators.
pub fn build_state(
    config: &Config,
    videos: Arc<dyn VideoStore>,
    storage: Arc<dyn Storage>,
    verifier: Arc<dyn CredentialVerifier>,
) -> Result<Arc<AppState>> {
    let assets = config
        .asset_config()
        .context("S3_BUCKET must be set to store uploaded assets")?;

    let resolver = Arc::new(PresignedUrlResolver::new(
        storage.clone(),
        assets.presign_ttl,
    ));

    let settings = PipelineSettings {
        assets,
        staging_dir: config.staging_dir().to_path_buf(),
        max_video_bytes: config.max_video_size_bytes() as u64,
        max_thumbnail_bytes: config.max_thumbnail_size_bytes() as u64,
        compensate_orphans: config.compensate_orphans(),
    };

    tracing::info!(
        bucket = %settings.assets.bucket,
        cdn_domain = ?settings.assets.cdn_domain,
        presign_ttl_secs = settings.assets.presign_ttl.as_secs(),
        staging_dir = %settings.staging_dir.display(),
        max_video_mb = settings.max_video_bytes / 1024 / 1024,
        ffprobe_path = %config.ffprobe_path(),
        ffmpeg_path = %config.ffmpeg_path(),
        compensate_orphans = settings.compensate_orphans,
        "Upload pipeline configured"
    );

    let pipeline = Arc::new(UploadPipeline::new(
        videos.clone(),
        storage.clone(),
        MediaInspector::new(config.ffprobe_path(), config.tool_timeout()),
        FastStartTranscoder::new(config.ffmpeg_path(), config.tool_timeout()),
        resolver.clone(),
        settings,
    ));

    Ok(Arc::new(AppState {
        config: config.clone(),
        videos,
        storage,
        verifier,
        pipeline,
        resolver,
    }))
}
