//! Bearer-token authentication.

pub mod jwt;
pub mod models;

pub use jwt::{bearer_token, CredentialVerifier, JwtVerifier};
pub use models::{AuthenticatedUser, JwtClaims};
