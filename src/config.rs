//! Configuration module for environment variables and application settings

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

/// Default model artifact shipped with the repository
pub const DEFAULT_MODEL_PATH: &str = "models/admission_regression_model.json";

/// Default `iss` claim for issued tokens
pub const DEFAULT_ISSUER: &str = "admission-api";

#[derive(Clone)]
pub struct Config {
    /// Token signing configuration
    pub jwt: JwtConfig,

    /// Server configuration
    pub server: ServerConfig,

    /// Location of the serialized regression model
    pub model_path: PathBuf,

    /// Credential overrides from `AUTH_USERS`; `None` keeps the demo users
    pub users: Option<HashMap<String, String>>,

    /// Origins allowed by the CORS layer
    pub cors_allowed_origins: Vec<String>,
}

// Only usernames are printed; passwords from AUTH_USERS must never end up in logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let usernames = self.users.as_ref().map(|users| {
            let mut names: Vec<&str> = users.keys().map(String::as_str).collect();
            names.sort_unstable();
            names
        });
        f.debug_struct("Config")
            .field("jwt", &self.jwt)
            .field("server", &self.server)
            .field("model_path", &self.model_path)
            .field("users", &usernames)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish()
    }
}

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
}

// The secret must never end up in logs.
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| anyhow!("JWT_SECRET environment variable is required"))?;

        // Heroku-style PORT takes precedence over SERVER_PORT
        let port = match lookup("PORT").or_else(|| lookup("SERVER_PORT")) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("invalid server port: {raw:?}"))?,
            None => 3000,
        };

        let users = lookup("AUTH_USERS")
            .map(|raw| parse_users(&raw))
            .transpose()?;

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            jwt: JwtConfig {
                secret,
                issuer: lookup("JWT_ISSUER").unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
            },
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
                port,
            },
            model_path: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
            users,
            cors_allowed_origins,
        })
    }
}

/// Parse `user:password,user:password` into a credential map.
fn parse_users(raw: &str) -> Result<HashMap<String, String>> {
    let mut users = HashMap::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (username, password) = entry
            .split_once(':')
            .ok_or_else(|| anyhow!("AUTH_USERS entry {entry:?} is not of the form user:password"))?;
        if username.is_empty() {
            return Err(anyhow!("AUTH_USERS contains an entry with an empty username"));
        }
        if users.insert(username.to_string(), password.to_string()).is_some() {
            return Err(anyhow!("AUTH_USERS lists user {username:?} more than once"));
        }
    }
    if users.is_empty() {
        return Err(anyhow!("AUTH_USERS is set but contains no users"));
    }
    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_only_secret() {
        let config = Config::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap();

        assert_eq!(config.jwt.secret, "s3cret");
        assert_eq!(config.jwt.issuer, DEFAULT_ISSUER);
        assert_eq!(config.server.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert!(config.users.is_none());
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn test_missing_or_blank_secret_is_rejected() {
        assert!(Config::from_lookup(lookup_from(&[])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("JWT_SECRET", "   ")])).is_err());
    }

    #[test]
    fn test_port_precedence_and_validation() {
        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "k"),
            ("SERVER_PORT", "8080"),
            ("PORT", "9090"),
        ]))
        .unwrap();
        assert_eq!(config.server.port, 9090);

        let bad = Config::from_lookup(lookup_from(&[("JWT_SECRET", "k"), ("SERVER_PORT", "http")]));
        assert!(bad.is_err());
    }

    #[test]
    fn test_auth_users_override() {
        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "k"),
            ("AUTH_USERS", "dave:davepw, erin:erin:pw"),
        ]))
        .unwrap();

        let users = config.users.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users["dave"], "davepw");
        // Only the first colon separates the username
        assert_eq!(users["erin"], "erin:pw");
    }

    #[test]
    fn test_auth_users_rejects_malformed_entries() {
        for raw in ["dave", ":pw", "dave:a,dave:b", " , "] {
            let result = Config::from_lookup(lookup_from(&[("JWT_SECRET", "k"), ("AUTH_USERS", raw)]));
            assert!(result.is_err(), "expected {raw:?} to be rejected");
        }
    }

    #[test]
    fn test_cors_origins_are_split_and_trimmed() {
        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "k"),
            ("CORS_ALLOWED_ORIGINS", "http://localhost:3001, https://example.org ,"),
        ]))
        .unwrap();
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://localhost:3001".to_string(), "https://example.org".to_string()]
        );
    }

    #[test]
    fn test_debug_output_redacts_secret() {
        let config = Config::from_lookup(lookup_from(&[("JWT_SECRET", "topsecret")])).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("topsecret"));
    }

    #[test]
    fn test_debug_output_hides_user_passwords() {
        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "k"),
            ("AUTH_USERS", "dave:hunter2pw,erin:correcthorse"),
        ]))
        .unwrap();
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("hunter2pw"), "{rendered}");
        assert!(!rendered.contains("correcthorse"), "{rendered}");
        assert!(rendered.contains("\"dave\""));
        assert!(rendered.contains("\"erin\""));
    }
}
