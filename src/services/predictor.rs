//! Regression Predictor
//!
//! Loads the trained admission model artifact and evaluates it for a single
//! feature vector.

use std::path::Path;

use anyhow::{Context, Result, anyhow, ensure};
use async_trait::async_trait;
use serde::Deserialize;

/// Number of features the admission model expects
pub const FEATURE_COUNT: usize = 7;

/// Opaque prediction capability used by the predict route
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Model identifier reported by readiness checks
    fn name(&self) -> &str;

    async fn predict(&self, features: [f64; FEATURE_COUNT]) -> Result<f64>;
}

/// Serialized linear regression: `intercept + Σ coefficients[i] * features[i]`
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    name: String,
    #[serde(default)]
    features: Vec<String>,
    intercept: f64,
    coefficients: Vec<f64>,
}

impl LinearModel {
    #[cfg(test)]
    pub fn new(name: impl Into<String>, intercept: f64, coefficients: [f64; FEATURE_COUNT]) -> Result<Self> {
        let model = Self {
            name: name.into(),
            features: Vec::new(),
            intercept,
            coefficients: coefficients.to_vec(),
        };
        model.validate()?;
        Ok(model)
    }

    /// Load a model artifact from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Invalid model file {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(raw).context("Failed to parse model JSON")?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        ensure!(!self.name.trim().is_empty(), "model name must not be empty");
        ensure!(
            self.coefficients.len() == FEATURE_COUNT,
            "expected {} coefficients, found {}",
            FEATURE_COUNT,
            self.coefficients.len()
        );
        ensure!(
            self.features.is_empty() || self.features.len() == FEATURE_COUNT,
            "expected {} feature names, found {}",
            FEATURE_COUNT,
            self.features.len()
        );
        ensure!(
            self.intercept.is_finite() && self.coefficients.iter().all(|c| c.is_finite()),
            "model parameters must be finite"
        );
        Ok(())
    }
}

#[async_trait]
impl Predictor for LinearModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn predict(&self, features: [f64; FEATURE_COUNT]) -> Result<f64> {
        let score = self
            .coefficients
            .iter()
            .zip(features.iter())
            .fold(self.intercept, |acc, (w, x)| acc + w * x);

        if !score.is_finite() {
            return Err(anyhow!("model produced a non-finite prediction for {:?}", features));
        }
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: [f64; FEATURE_COUNT] = [320.0, 110.0, 5.0, 5.0, 5.0, 9.0, 1.0];

    #[tokio::test]
    async fn test_bundled_model_predicts_example() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(crate::config::DEFAULT_MODEL_PATH);
        let model = LinearModel::from_file(path).unwrap();

        assert_eq!(model.name(), "admission_regression_model");
        let prediction = model.predict(EXAMPLE).await.unwrap();
        assert_eq!((prediction * 10.0).round(), 8.0, "got {prediction}");
    }

    #[tokio::test]
    async fn test_linear_combination() {
        let model = LinearModel::new("unit", 1.0, [1.0, 2.0, 0.0, 0.0, 0.0, 0.0, -1.0]).unwrap();
        let prediction = model.predict([1.0, 1.0, 9.0, 9.0, 9.0, 9.0, 3.0]).await.unwrap();
        assert_eq!(prediction, 1.0);
    }

    #[tokio::test]
    async fn test_overflow_is_an_error() {
        let model = LinearModel::new("huge", 0.0, [f64::MAX; FEATURE_COUNT]).unwrap();
        assert!(model.predict([f64::MAX; FEATURE_COUNT]).await.is_err());
    }

    #[test]
    fn test_rejects_malformed_artifacts() {
        let cases = [
            r#"{"name":"m","intercept":0.0,"coefficients":[1,2,3]}"#,
            r#"{"name":"","intercept":0.0,"coefficients":[1,2,3,4,5,6,7]}"#,
            r#"{"name":"m","features":["a"],"intercept":0.0,"coefficients":[1,2,3,4,5,6,7]}"#,
            r#"{"name":"m","coefficients":[1,2,3,4,5,6,7]}"#,
            "not json",
        ];
        for raw in cases {
            assert!(LinearModel::from_json(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(LinearModel::from_file("/nonexistent/model.json").is_err());
    }
}
