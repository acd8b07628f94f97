//! Fast-start remuxing via `ffmpeg`.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tubely_core::constants::FAST_START_SUFFIX;

use crate::command::{describe_failure, run_tool};
use crate::error::ProcessingError;
use crate::staging::ScratchFile;

/// Output path for a fast-start copy of `input`: the input path plus a fixed suffix.
pub fn fast_start_path(input: &Path) -> PathBuf {
    let mut path = OsString::from(input.as_os_str());
    path.push(FAST_START_SUFFIX);
    PathBuf::from(path)
}

/// Copies every stream without re-encoding and moves the index atoms to the front
/// of the container, so playback can start before the download completes.
#[derive(Debug, Clone)]
pub struct FastStartTranscoder {
    ffmpeg_path: String,
    timeout: Duration,
}

impl FastStartTranscoder {
    pub fn new(ffmpeg_path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            timeout,
        }
    }

    /// Rewrite `input` next to itself. The input is left in place; the returned guard
    /// owns the output and deletes it when dropped.
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        file.path = %input.display()
    ))]
    pub async fn rewrite_for_streaming(&self, input: &Path) -> Result<ScratchFile, ProcessingError> {
        let start = std::time::Instant::now();
        // Held before the run so partial output is removed on failure or cancellation.
        let output_file = ScratchFile::new(fast_start_path(input));

        let output = run_tool(
            &self.ffmpeg_path,
            [
                OsStr::new("-i"),
                input.as_os_str(),
                OsStr::new("-c"),
                OsStr::new("copy"),
                OsStr::new("-movflags"),
                OsStr::new("faststart"),
                OsStr::new("-f"),
                OsStr::new("mp4"),
                OsStr::new("-y"),
                output_file.path().as_os_str(),
            ],
            self.timeout,
        )
        .await?;

        if !output.status.success() {
            let failure = describe_failure(&output);
            tracing::error!(error = %failure, "ffmpeg failed");
            return Err(ProcessingError::Transcode(failure));
        }

        tracing::info!(
            output_path = %output_file.path().display(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Fast-start remux completed"
        );

        Ok(output_file)
    }
}
