//! Tubely Processing Library
//!
//! Local media handling for the upload pipeline: staging request bodies to
//! request-scoped temporary files, probing them with `ffprobe`, remuxing them for
//! fast start with `ffmpeg`, and naming the objects they are stored under.
//!
//! Every temporary file handed out by this crate is owned by a guard that removes
//! it on drop, so callers get cleanup on every exit path by holding the guard for
//! the rest of the request.

mod command;
pub mod error;
pub mod inspector;
pub mod keys;
pub mod staging;
pub mod transcoder;

pub use error::ProcessingError;
pub use inspector::{parse_probe_output, MediaInspector};
pub use keys::{derive_asset_key, derive_key, random_asset_name};
pub use staging::{ScratchFile, StagedUpload};
pub use transcoder::FastStartTranscoder;
