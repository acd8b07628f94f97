use std::io;
use std::time::Duration;

use thiserror::Error;
use tubely_core::AppError;

/// Errors raised while staging, probing or remuxing an upload.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("{tool} could not be started: {source}")]
    Launch {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("{tool} did not finish within {}s", .timeout.as_secs())]
    Timeout { tool: String, timeout: Duration },

    #[error("Probe failed: {0}")]
    Probe(String),

    #[error("Probe output contains no video stream")]
    NoVideoStream,

    #[error("Transcode failed: {0}")]
    Transcode(String),

    #[error("Upload exceeds the {limit} byte limit")]
    TooLarge { limit: u64 },

    #[error("Failed to read upload body: {0}")]
    BodyRead(#[source] io::Error),

    #[error("Failed to write staging file: {0}")]
    Staging(#[source] io::Error),
}

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::TooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            ProcessingError::BodyRead(_) => AppError::InvalidInput(err.to_string()),
            ProcessingError::Staging(_) => AppError::Internal(err.to_string()),
            other => AppError::Processing(other.to_string()),
        }
    }
}
