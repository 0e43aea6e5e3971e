//! # Server Module
//!
//! HTTP server setup and route configuration for the admission prediction API.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{CredentialStore, InMemoryCredentialStore, JwtService};
use crate::config::Config;
use crate::routes;
use crate::services::{LinearModel, Predictor};

/// Application state shared across all route handlers.
///
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<dyn CredentialStore>,
    pub jwt_service: Arc<JwtService>,
    pub predictor: Arc<dyn Predictor>,
}

impl AppState {
    /// Build the state from configuration, loading the model artifact from disk
    pub fn from_config(config: &Config) -> Result<Self> {
        let credentials = match &config.users {
            Some(users) => InMemoryCredentialStore::new(users.clone()),
            None => InMemoryCredentialStore::demo(),
        };
        tracing::info!("Loaded {} user credentials", credentials.len());

        let model = LinearModel::from_file(&config.model_path)?;
        tracing::info!("Loaded model '{}' from {}", model.name(), config.model_path.display());

        Ok(Self {
            credentials: Arc::new(credentials),
            jwt_service: Arc::new(JwtService::new(&config.jwt.secret, &config.jwt.issuer)),
            predictor: Arc::new(model),
        })
    }
}

/// Assemble the application router.
///
/// Only routers built with the auth layer (`create_predict_routes`) are gated;
/// everything else is public.
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .merge(routes::health::create_health_routes())
        .merge(routes::auth::create_auth_routes())
        .merge(routes::predict::create_predict_routes(app_state.jwt_service.clone()))
        .with_state(app_state)
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin {origin:?}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ]))
}

/// Starts the HTTP server and serves until Ctrl+C or SIGTERM.
pub async fn start(config: Config) -> Result<()> {
    let app_state = AppState::from_config(&config)?;

    let mut app = build_router(app_state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));
    if !config.cors_allowed_origins.is_empty() {
        app = app.layer(cors_layer(&config.cors_allowed_origins)?);
    }

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("Failed to bind to {addr} - port may already be in use"))?;

    tracing::info!("🚀 Admission API listening on http://{}", addr);
    tracing::info!("🏥 Health check available at http://{}/ping", addr);
    tracing::info!("🔐 Login at http://{}/login, predictions at http://{}/predict", addr, addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
