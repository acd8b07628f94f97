//! Data models for the application
//!
//! Video records as persisted, the responses returned to clients, and the small
//! value types the upload pipeline passes between stages.

mod aspect;
mod storage_reference;
mod video;

pub use aspect::*;
pub use storage_reference::*;
pub use video::*;
