//! JWT Token Service
//!
//! Issues HS256-signed tokens with a caller-chosen lifetime and verifies
//! presented tokens, separating expired tokens from otherwise invalid ones.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::{error::AuthError, models::AuthUser};

/// Shortest lifetime a caller may request, in seconds
pub const MIN_TOKEN_LIFETIME_SECS: i64 = 1;
/// Longest lifetime a caller may request, in seconds; also the login default
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 3600;

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Authenticated username
    pub sub: String,
    /// Issued-at, whole seconds since the epoch
    pub iat: i64,
    /// Expiration, whole seconds since the epoch
    pub exp: i64,
    /// Token issuer
    pub iss: String,
}

/// A freshly signed token and the instant it stops being accepted
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum IssueError {
    #[error(
        "token lifetime must be between {min} and {max} seconds, got {0}",
        min = MIN_TOKEN_LIFETIME_SECS,
        max = MAX_TOKEN_LIFETIME_SECS
    )]
    LifetimeOutOfRange(i64),

    #[error("failed to sign token")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Returns the lifetime as a duration when it lies in the accepted range.
pub fn validate_lifetime(lifetime_secs: i64) -> Result<Duration, IssueError> {
    if (MIN_TOKEN_LIFETIME_SECS..=MAX_TOKEN_LIFETIME_SECS).contains(&lifetime_secs) {
        Ok(Duration::seconds(lifetime_secs))
    } else {
        Err(IssueError::LifetimeOutOfRange(lifetime_secs))
    }
}

/// JWT Service for token operations
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
}

impl JwtService {
    /// Create a new JWT service with the provided secret and issuer
    pub fn new(secret: &str, issuer: &str) -> Self {
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        // Expiry is checked by hand in `verify_at` against the injected clock,
        // with no leeway.
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        Self {
            encoding_key,
            decoding_key,
            validation,
            issuer: issuer.to_string(),
        }
    }

    /// Sign a token for an already authenticated user
    pub fn issue(&self, username: &str, lifetime_secs: i64) -> Result<IssuedToken, IssueError> {
        self.issue_at(username, lifetime_secs, Utc::now())
    }

    /// Sign a token as if issued at `now`.
    ///
    /// `iat` is `now` truncated to the whole second and `exp = iat + lifetime`.
    /// A token issued late in a second (e.g. at x.9s with a 1s lifetime) therefore
    /// expires up to a second before `now + lifetime`; this is intended, not an
    /// off-by-one.
    pub fn issue_at(
        &self,
        username: &str,
        lifetime_secs: i64,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, IssueError> {
        let lifetime = validate_lifetime(lifetime_secs)?;

        // Claims carry whole seconds, so issuance is anchored on a whole second
        // to keep `exp - iat` equal to the requested lifetime.
        let issued_at = now.timestamp();
        let expires_at = issued_at + lifetime.num_seconds();

        let claims = Claims {
            sub: username.to_string(),
            iat: issued_at,
            exp: expires_at,
            iss: self.issuer.clone(),
        };

        let token = encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)?;

        tracing::debug!("Issued token for {} expiring at {}", username, expires_at);

        Ok(IssuedToken {
            token,
            expires_at: DateTime::from_timestamp(expires_at, 0).unwrap_or(now + lifetime),
        })
    }

    /// Validate a presented credential (`Bearer <token>` or a bare token)
    pub fn verify(&self, presented: &str) -> Result<AuthUser, AuthError> {
        self.verify_at(presented, Utc::now())
    }

    pub fn verify_at(&self, presented: &str, now: DateTime<Utc>) -> Result<AuthUser, AuthError> {
        let token = bearer_token(presented)?;

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AuthError::InvalidToken)?
            .claims;

        // A token is rejected from its expiry instant onwards.
        if now.timestamp_millis() >= claims.exp.saturating_mul(1000) {
            return Err(AuthError::ExpiredToken);
        }

        Ok(AuthUser {
            username: claims.sub,
        })
    }
}

/// Extract the token from an `Authorization` value.
///
/// Accepts `Bearer <token>` (scheme is case-insensitive) or a single bare token.
fn bearer_token(presented: &str) -> Result<&str, AuthError> {
    let mut parts = presented.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (None, _, _) => Err(AuthError::MissingToken),
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        (Some(scheme), None, None) if scheme.eq_ignore_ascii_case("bearer") => {
            Err(AuthError::InvalidToken)
        }
        (Some(token), None, None) => Ok(token),
        _ => Err(AuthError::InvalidToken),
    }
}
