//! Video and thumbnail ingestion.

mod pipeline;

pub use pipeline::{IncomingUpload, PipelineSettings, UploadPipeline};
