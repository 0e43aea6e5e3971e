//! # Services Module
//!
//! Collaborators the HTTP layer delegates to. The regression predictor is the
//! only one: an opaque "features in, score out" capability.

pub mod predictor;

pub use predictor::{FEATURE_COUNT, LinearModel, Predictor};
