//! Prediction route, gated by the auth middleware

use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{State, rejection::JsonRejection},
    middleware,
    routing::post,
};
use serde::{Deserialize, Serialize};

use crate::auth::{AuthUser, JwtService, middleware::AuthMiddleware};
use crate::error::ApiError;
use crate::server::AppState;
use crate::services::FEATURE_COUNT;

/// Admission features; every field is required
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub gre_score: i64,
    pub toefl_score: i64,
    pub university_rating: i64,
    pub sop: i64,
    pub lor: i64,
    pub cgpa: i64,
    pub research: i64,
}

impl PredictRequest {
    /// Feature vector in the column order the model was trained on
    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        [
            self.gre_score,
            self.toefl_score,
            self.university_rating,
            self.sop,
            self.lor,
            self.cgpa,
            self.research,
        ]
        .map(|v| v as f64)
    }
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: f64,
}

/// `POST /predict`
///
/// Incomplete or malformed payloads are rejected with 400 before the predictor runs.
pub async fn predict(
    Extension(user): Extension<AuthUser>,
    State(app_state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload.inspect_err(|e| {
        tracing::warn!("Rejected prediction payload from {}: {}", user.username, e.body_text());
    })?;

    let prediction = app_state.predictor.predict(request.features()).await?;
    tracing::info!("Prediction for {}: {:.4}", user.username, prediction);

    Ok(Json(PredictResponse { prediction }))
}

/// Routes that require a valid bearer token
pub fn create_predict_routes(jwt_service: Arc<JwtService>) -> Router<AppState> {
    Router::new()
        .route("/predict", post(predict))
        .route_layer(middleware::from_fn_with_state(jwt_service, AuthMiddleware::validate_token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_features_follow_training_column_order() {
        let req: PredictRequest = serde_json::from_str(
            r#"{"gre_score":320,"toefl_score":110,"university_rating":5,"sop":4,"lor":3,"cgpa":9,"research":1}"#,
        )
        .unwrap();

        assert_eq!(req.features(), [320.0, 110.0, 5.0, 4.0, 3.0, 9.0, 1.0]);
    }

    #[test]
    fn test_payload_requires_every_field() {
        let missing_toefl = r#"{"gre_score":320,"university_rating":5,"sop":5,"lor":5,"cgpa":9,"research":1}"#;
        assert!(serde_json::from_str::<PredictRequest>(missing_toefl).is_err());

        let fractional = r#"{"gre_score":320,"toefl_score":110,"university_rating":5,"sop":5,"lor":5,"cgpa":9.5,"research":1}"#;
        assert!(serde_json::from_str::<PredictRequest>(fractional).is_err());
    }
}
