//! # Authentication Module
//!
//! Credential verification, JWT issuance and validation, and the middleware
//! that gates protected routes behind a bearer token.

pub mod credentials;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;

pub use credentials::{CredentialStore, InMemoryCredentialStore};
pub use error::AuthError;
pub use jwt::JwtService;
pub use models::AuthUser;
