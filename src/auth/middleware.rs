//! Authentication Middleware
//!
//! Axum middleware for JWT token validation. It is attached per route with
//! `route_layer`, so only routes registered as protected ever run it.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::{error::AuthError, jwt::JwtService};
use crate::error::ApiError;

/// Authentication middleware that validates bearer tokens and injects the user
pub struct AuthMiddleware;

impl AuthMiddleware {
    /// Middleware function for validating JWT tokens
    pub async fn validate_token(
        State(jwt_service): State<Arc<JwtService>>,
        mut req: Request,
        next: Next,
    ) -> Result<Response, ApiError> {
        let Some(value) = req.headers().get(header::AUTHORIZATION) else {
            tracing::warn!("[AuthMiddleware] Missing Authorization header: {} {}", req.method(), req.uri());
            return Err(AuthError::MissingToken.into());
        };

        let auth_user = value
            .to_str()
            .map_err(|_| AuthError::InvalidToken)
            .and_then(|presented| jwt_service.verify(presented))
            .map_err(|e| {
                tracing::warn!("[AuthMiddleware] Rejected token for {}: {}", req.uri(), e);
                // A header that is present but blank is reported as invalid, not missing
                match e {
                    AuthError::MissingToken => AuthError::InvalidToken,
                    other => other,
                }
            })?;

        tracing::debug!("[AuthMiddleware] Authenticated {} for {}", auth_user.username, req.uri());

        // Insert the user into request extensions for downstream handlers
        req.extensions_mut().insert(auth_user);

        Ok(next.run(req).await)
    }
}
