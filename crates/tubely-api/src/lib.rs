//! Tubely API Library
//!
//! This crate provides the HTTP handlers, authentication, the upload pipeline and
//! application setup for the video-hosting service.

// Module declarations
pub mod constants;
mod handlers;
pub mod services;
pub mod setup;
pub mod telemetry;
mod utils;

// Public modules
pub mod auth;
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
