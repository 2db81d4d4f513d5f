//! Application Configuration
//!
//! Configuration for the Account application layer. Built once at startup
//! and threaded into use cases; nothing here is read from the environment.

use std::time::Duration;

pub use platform::password::HashCost;

/// Account application configuration
#[derive(Clone)]
pub struct AccountConfig {
    /// Secret key for credential HMAC signing (32 bytes)
    pub credential_secret: [u8; 32],
    /// Credential lifetime (7 days)
    pub credential_ttl: Duration,
    /// How long past expiry a credential may still be refreshed.
    /// `None` allows refresh of any cryptographically valid credential.
    pub refresh_grace: Option<Duration>,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Argon2id cost for new password hashes
    pub hash_cost: HashCost,
    /// Upper bound on profile search results
    pub search_limit: usize,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            credential_secret: [0u8; 32],
            credential_ttl: Duration::from_secs(7 * 24 * 3600), // 7 days
            refresh_grace: Some(Duration::from_secs(30 * 24 * 3600)), // 30 days
            password_pepper: None,
            hash_cost: HashCost::default(),
            search_limit: 20,
        }
    }
}

impl AccountConfig {
    /// Create config with a random credential secret
    pub fn with_random_secret() -> Self {
        Self {
            credential_secret: platform::crypto::random_key(),
            ..Default::default()
        }
    }

    /// Create config for development (random secret, default cost)
    pub fn development() -> Self {
        Self::with_random_secret()
    }

    /// Cheapest hashing cost; for tests only
    pub fn for_tests() -> Self {
        Self {
            hash_cost: HashCost::minimal(),
            ..Self::with_random_secret()
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

impl std::fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountConfig")
            .field("credential_secret", &"[REDACTED]")
            .field("credential_ttl", &self.credential_ttl)
            .field("refresh_grace", &self.refresh_grace)
            .field(
                "password_pepper",
                &self.password_pepper.as_ref().map(|_| "[REDACTED]"),
            )
            .field("hash_cost", &self.hash_cost)
            .field("search_limit", &self.search_limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AccountConfig::default();
        assert_eq!(config.credential_ttl, Duration::from_secs(604_800));
        assert!(config.pepper().is_none());
    }

    #[test]
    fn test_random_secret_differs() {
        assert_ne!(
            AccountConfig::with_random_secret().credential_secret,
            AccountConfig::with_random_secret().credential_secret
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AccountConfig {
            password_pepper: Some(b"pepper".to_vec()),
            ..AccountConfig::for_tests()
        };
        let text = format!("{config:?}");
        assert!(!text.contains("pepper\""));
        assert!(text.contains("[REDACTED]"));
    }
}
