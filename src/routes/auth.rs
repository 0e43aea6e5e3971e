//! Auth routes: credential check and token issuance

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};

use crate::auth::jwt::validate_lifetime;
use crate::auth::models::{LoginRequest, TokenResponse};
use crate::error::ApiError;
use crate::server::AppState;

/// `POST /login`
///
/// The requested lifetime is validated before credentials are looked at, so an
/// out-of-range value is a 400 whether or not the credentials are good. A failed
/// login never says which of username or password was wrong.
pub async fn login(
    State(app_state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(payload) = payload?;
    let lifetime = payload.timedelta_before_exp_sec;

    validate_lifetime(lifetime).inspect_err(|e| {
        tracing::warn!("Login rejected: {}", e);
    })?;

    let (Some(username), Some(password)) = (payload.username, payload.password) else {
        tracing::warn!("Login rejected: username or password missing");
        return Err(ApiError::InvalidCredentials);
    };

    if !app_state.credentials.verify(&username, &password).await {
        tracing::warn!("Login failed for user {}", username);
        return Err(ApiError::InvalidCredentials);
    }

    let issued = app_state.jwt_service.issue(&username, lifetime)?;
    tracing::info!("Issued token for {} valid for {}s", username, lifetime);

    Ok(Json(TokenResponse {
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}

pub fn create_auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}
