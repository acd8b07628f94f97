//! Tubely Database Layer
//!
//! Postgres access for video records. Callers depend on the [`VideoStore`] trait so
//! handlers and the upload pipeline can be exercised without a database.

pub mod db;
pub mod store;

pub use db::VideoRepository;
pub use store::VideoStore;
