//! Credential Store
//!
//! Username/password lookup behind a trait so a real identity store can replace
//! the in-memory mapping without touching the token or middleware code.

use std::collections::HashMap;

use async_trait::async_trait;

/// Lookup interface for verifying login credentials
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns true iff `username` is known and its secret equals `password`.
    ///
    /// An unknown username is a plain `false`, never an error.
    async fn verify(&self, username: &str, password: &str) -> bool;
}

/// Fixed, read-only credential mapping held for the lifetime of the process
#[derive(Debug, Clone)]
pub struct InMemoryCredentialStore {
    users: HashMap<String, String>,
}

impl InMemoryCredentialStore {
    pub fn new(users: HashMap<String, String>) -> Self {
        Self { users }
    }

    /// Demonstration users served when no override is configured
    pub fn demo() -> Self {
        Self::new(
            [
                ("alice", "alicepassword"),
                ("bob", "bobpassword"),
                ("charlie", "charliepassword"),
            ]
            .into_iter()
            .map(|(user, password)| (user.to_string(), password.to_string()))
            .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn verify(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .is_some_and(|expected| expected == password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_users_verify() {
        let store = InMemoryCredentialStore::demo();

        assert_eq!(store.len(), 3);
        assert!(store.verify("alice", "alicepassword").await);
        assert!(store.verify("bob", "bobpassword").await);
        assert!(store.verify("charlie", "charliepassword").await);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user() {
        let store = InMemoryCredentialStore::demo();

        assert!(!store.verify("alice", "wrong-password").await);
        assert!(!store.verify("mallory", "alicepassword").await);
        assert!(!store.verify("", "").await);
    }

    #[tokio::test]
    async fn test_match_is_exact() {
        let store = InMemoryCredentialStore::demo();

        assert!(!store.verify("Alice", "alicepassword").await);
        assert!(!store.verify("alice", "alicepassword ").await);
        assert!(!store.verify("alice", "ALICEPASSWORD").await);
    }
}
