//! Token lifecycle errors

use thiserror::Error;

/// Reasons a presented token can fail verification.
///
/// `ExpiredToken` and `InvalidToken` currently share an HTTP status but must stay
/// distinguishable so the gate can report them separately.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing authentication token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,
}
