//! Application state shared by every handler.

use crate::auth::CredentialVerifier;
use crate::services::{PresignedUrlResolver, UploadPipeline};
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoStore;
use tubely_storage::Storage;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoStore>,
    pub storage: Arc<dyn Storage>,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub pipeline: Arc<UploadPipeline>,
    pub resolver: Arc<PresignedUrlResolver>,
}
