use axum::{Router, extract::State, response::Json, routing::get};
use serde_json::json;

use crate::server::AppState;

/// Liveness endpoint handler.
///
/// # Route
/// - **Method**: GET
/// - **Path**: `/ping`
/// - **Response**: `{"status": "pong"}`
///
/// Never gated by authentication, so load balancers and container probes can
/// call it without a token.
pub async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "status": "pong" }))
}

/// Readiness endpoint handler.
///
/// Reports the loaded model so a deployment can confirm which artifact is being
/// served. The model is loaded before the listener binds, so a reachable server
/// is always ready.
pub async fn ready(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "status": "ready", "model": state.predictor.name() }))
}

pub fn create_health_routes() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/readyz", get(ready))
}
