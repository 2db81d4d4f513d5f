//! Startup settings read from the environment

use std::env;
use std::time::Duration;

use account::AccountConfig;
use anyhow::{Context, bail};
use base64::Engine;
use base64::engine::general_purpose;

const DEFAULT_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";
const DEFAULT_PORT: u16 = 8080;

/// Everything the binary needs before serving
#[derive(Debug)]
pub struct Settings {
    pub database_url: Option<String>,
    pub frontend_origins: Vec<String>,
    pub port: u16,
    pub account: AccountConfig,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut account = match var("ACCOUNT_CREDENTIAL_SECRET") {
            Some(secret) => AccountConfig {
                credential_secret: decode_secret(&secret)?,
                ..AccountConfig::default()
            },
            None if cfg!(debug_assertions) => {
                tracing::warn!("ACCOUNT_CREDENTIAL_SECRET not set, using a random secret");
                AccountConfig::development()
            }
            None => bail!("ACCOUNT_CREDENTIAL_SECRET must be set in production"),
        };

        if let Some(ttl) = var("ACCOUNT_CREDENTIAL_TTL_SECS") {
            account.credential_ttl =
                Duration::from_secs(parse(&ttl, "ACCOUNT_CREDENTIAL_TTL_SECS")?);
        }
        if let Some(grace) = var("ACCOUNT_REFRESH_GRACE_SECS") {
            account.refresh_grace =
                Some(Duration::from_secs(parse(&grace, "ACCOUNT_REFRESH_GRACE_SECS")?));
        }
        if let Some(pepper) = var("ACCOUNT_PASSWORD_PEPPER") {
            account.password_pepper = Some(pepper.into_bytes());
        }
        if let Some(memory) = var("ACCOUNT_HASH_MEMORY_KIB") {
            account.hash_cost.memory_kib = parse(&memory, "ACCOUNT_HASH_MEMORY_KIB")?;
        }
        if let Some(iterations) = var("ACCOUNT_HASH_ITERATIONS") {
            account.hash_cost.iterations = parse(&iterations, "ACCOUNT_HASH_ITERATIONS")?;
        }

        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let port = match var("PORT") {
            Some(port) => parse(&port, "PORT")?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            database_url: var("DATABASE_URL"),
            frontend_origins,
            port,
            account,
        })
    }
}

fn decode_secret(encoded: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = general_purpose::STANDARD
        .decode(encoded.trim())
        .context("ACCOUNT_CREDENTIAL_SECRET must be base64")?;
    bytes.try_into().map_err(|b: Vec<u8>| {
        anyhow::anyhow!(
            "ACCOUNT_CREDENTIAL_SECRET must decode to 32 bytes, got {}",
            b.len()
        )
    })
}

fn parse<T>(value: &str, key: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("{key} has an invalid value: {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> anyhow::Result<Settings> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let secret = general_purpose::STANDARD.encode([7u8; 32]);
        let s = settings(&[("ACCOUNT_CREDENTIAL_SECRET", secret.as_str())]).unwrap();
        assert_eq!(s.port, DEFAULT_PORT);
        assert!(s.database_url.is_none());
        assert_eq!(s.account.credential_secret, [7u8; 32]);
        assert_eq!(s.frontend_origins.len(), 2);
    }

    #[test]
    fn test_overrides() {
        let secret = general_purpose::STANDARD.encode([1u8; 32]);
        let s = settings(&[
            ("ACCOUNT_CREDENTIAL_SECRET", secret.as_str()),
            ("ACCOUNT_CREDENTIAL_TTL_SECS", "60"),
            ("ACCOUNT_HASH_ITERATIONS", "3"),
            ("FRONTEND_ORIGINS", "https://a.example, https://b.example,"),
            ("PORT", "9000"),
            ("DATABASE_URL", "postgres://localhost/app"),
        ])
        .unwrap();
        assert_eq!(s.account.credential_ttl, Duration::from_secs(60));
        assert_eq!(s.account.hash_cost.iterations, 3);
        assert_eq!(s.frontend_origins, vec!["https://a.example", "https://b.example"]);
        assert_eq!(s.port, 9000);
        assert!(s.database_url.is_some());
    }

    #[test]
    fn test_rejects_bad_values() {
        let short = general_purpose::STANDARD.encode([1u8; 16]);
        assert!(settings(&[("ACCOUNT_CREDENTIAL_SECRET", short.as_str())]).is_err());
        assert!(settings(&[("ACCOUNT_CREDENTIAL_SECRET", "%%%")]).is_err());

        let secret = general_purpose::STANDARD.encode([1u8; 32]);
        assert!(settings(&[("ACCOUNT_CREDENTIAL_SECRET", secret.as_str()), ("PORT", "http")]).is_err());
    }
}
