//! Domain services behind the HTTP handlers.

pub mod access;
pub mod presign;
pub mod upload;

pub use access::AccessValidator;
pub use presign::PresignedUrlResolver;
pub use upload::{IncomingUpload, PipelineSettings, UploadPipeline};
