//! Tubely Storage Library
//!
//! This crate provides the object-storage abstraction used by the upload pipeline,
//! with implementations for S3 (and S3-compatible providers) and the local filesystem.
//!
//! # Addressing
//!
//! Every operation names its bucket explicitly. Keys are the pipeline's
//! `<prefix>/<random>.<ext>` names and must not contain `..` or a leading `/`.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ObjectReader, Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
