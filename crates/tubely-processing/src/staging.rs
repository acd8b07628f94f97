//! Request-scoped temporary files.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tubely_core::constants::STAGING_FILE_PREFIX;

use crate::error::ProcessingError;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// A local copy of an in-flight upload. The file is deleted when this is dropped.
#[derive(Debug)]
pub struct StagedUpload {
    path: TempPath,
    media_type: String,
    size: u64,
}

impl StagedUpload {
    /// Copy `reader` to a new file in `dir`, failing once more than `max_bytes` arrive.
    ///
    /// Read failures (the client side) and write failures (local disk) are reported
    /// separately. On any error the partial file is removed before returning.
    pub async fn stage<R>(
        reader: &mut R,
        dir: &Path,
        extension: &str,
        media_type: impl Into<String>,
        max_bytes: u64,
    ) -> Result<Self, ProcessingError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let named = tempfile::Builder::new()
            .prefix(STAGING_FILE_PREFIX)
            .suffix(extension)
            .tempfile_in(dir)
            .map_err(ProcessingError::Staging)?;
        let (file, path) = named.into_parts();
        let mut file = tokio::fs::File::from_std(file);

        let mut buf = vec![0u8; COPY_BUFFER_SIZE];
        let mut size: u64 = 0;

        loop {
            let n = reader.read(&mut buf).await.map_err(ProcessingError::BodyRead)?;
            if n == 0 {
                break;
            }

            size += n as u64;
            if size > max_bytes {
                return Err(ProcessingError::TooLarge { limit: max_bytes });
            }

            file.write_all(&buf[..n])
                .await
                .map_err(ProcessingError::Staging)?;
        }

        file.flush().await.map_err(ProcessingError::Staging)?;

        tracing::debug!(path = %path.display(), size_bytes = size, "Upload staged");

        Ok(Self {
            path,
            media_type: media_type.into(),
            size,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub async fn open(&self) -> io::Result<tokio::fs::File> {
        tokio::fs::File::open(&self.path).await
    }
}

/// Owns a derived file next to a staged upload and removes it on drop, whether or
/// not the tool that was meant to write it ever did.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn open(&self) -> io::Result<tokio::fs::File> {
        tokio::fs::File::open(&self.path).await
    }

    pub async fn size(&self) -> io::Result<u64> {
        Ok(tokio::fs::metadata(&self.path).await?.len())
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove scratch file");
            }
        }
    }
}
