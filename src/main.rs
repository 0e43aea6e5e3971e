//! # Admission API
//!
//! HTTP service that serves a trained graduate-admission regression model
//! behind bearer-token authentication. Built with Axum and Tokio.
//!
//! ## Architecture
//! - `server`: router assembly, shared state and serving loop
//! - `config`: environment variable configuration
//! - `auth`: credential store, JWT issuance/verification and the auth middleware
//! - `services`: the regression predictor
//! - `routes`: HTTP handlers
//!   - `health`: liveness and readiness
//!   - `auth`: `POST /login`
//!   - `predict`: `POST /predict` (requires a token)
//!
//! ## Environment Setup
//! `JWT_SECRET` is required; everything else has a default. Values may also be
//! placed in a `.env` file.
//!
//! ## Running the Server
//! ```bash
//! JWT_SECRET=change-me cargo run
//! ```
//!
//! ```bash
//! TOKEN=$(curl -s -X POST localhost:3000/login \
//!   -H 'Content-Type: application/json' \
//!   -d '{"username":"alice","password":"alicepassword","timedelta_before_exp_sec":600}' | jq -r .token)
//! curl -X POST localhost:3000/predict -H "Authorization: Bearer $TOKEN" \
//!   -H 'Content-Type: application/json' \
//!   -d '{"gre_score":320,"toefl_score":110,"university_rating":5,"sop":5,"lor":5,"cgpa":9,"research":1}'
//! ```

mod auth;
mod config;
mod error;
mod routes;
mod server;
mod services;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables still apply
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();

    tracing::info!("🏁 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    tracing::info!("🏗️  Build profile: {}", if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    });

    let config = config::Config::from_env()?;
    tracing::debug!("Configuration: {:?}", config);

    server::start(config).await
}
