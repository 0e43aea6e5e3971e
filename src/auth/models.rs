//! Authentication Models
//!
//! Data structures for login requests, responses, and the authenticated identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::MAX_TOKEN_LIFETIME_SECS;

/// Authenticated user extracted from a verified token.
///
/// Inserted into request extensions by the auth middleware and scoped to that request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
}

/// Login request payload
///
/// Missing credentials are treated as a mismatch rather than a malformed body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_lifetime")]
    pub timedelta_before_exp_sec: i64,
}

fn default_lifetime() -> i64 {
    MAX_TOKEN_LIFETIME_SECS
}

/// Token response after successful authentication
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_defaults() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"username":"alice","password":"alicepassword"}"#).unwrap();
        assert_eq!(req.username.as_deref(), Some("alice"));
        assert_eq!(req.timedelta_before_exp_sec, 3600);

        let empty: LoginRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.username.is_none());
        assert!(empty.password.is_none());
    }

    #[test]
    fn test_login_request_rejects_non_integer_lifetime() {
        let result = serde_json::from_str::<LoginRequest>(
            r#"{"username":"alice","password":"x","timedelta_before_exp_sec":"soon"}"#,
        );
        assert!(result.is_err());
    }
}
