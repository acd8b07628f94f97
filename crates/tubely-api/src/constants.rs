//! API-level constants

/// Prefix for all versioned API routes.
pub const API_PREFIX: &str = "/api";

/// Upper bound for a readiness probe's dependency check, in seconds.
pub const READINESS_TIMEOUT_SECS: u64 = 5;

/// Default cap on concurrently served requests (`HTTP_CONCURRENCY_LIMIT`).
pub const DEFAULT_HTTP_CONCURRENCY_LIMIT: usize = 10_000;

pub const VIDEO_UPLOADED_MESSAGE: &str = "Video uploaded successfully";

/// Allowance for multipart boundaries and part headers on top of the file limit.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;
