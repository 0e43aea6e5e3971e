// # Routes Module
//
// HTTP route handlers, grouped by functionality. Each module exposes a
// `create_*_routes` function that `server.rs` merges into the main router.
// Modules that need the auth gate attach it to their own routes.

/// Liveness and readiness endpoints
pub mod health;

/// Login and token issuance
pub mod auth;

/// Token-gated model inference
pub mod predict;
