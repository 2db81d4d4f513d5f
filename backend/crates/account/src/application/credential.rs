//! Credential Codec
//!
//! Stateless bearer credential:
//! `base64url(JSON claims) "." base64url(HMAC-SHA256(secret, first segment))`.
//!
//! The signature is checked before anything in the payload is trusted.

use chrono::{DateTime, TimeZone, Utc};
use kernel::id::UserId;
use platform::crypto::{from_base64url, hmac_sha256, to_base64url, verify_hmac_sha256};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Decoding failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// Wrong shape, bad encoding or bad signature
    #[error("invalid credential")]
    Invalid,
    /// Well-formed and correctly signed, but past `exp`
    #[error("credential expired")]
    Expired,
}

/// Signed claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: UserId,
    /// Issued at, Unix seconds
    pub iat: i64,
    /// Expires at, Unix seconds
    pub exp: i64,
}

impl Claims {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Compact JSON payload. Every field is a UUID or an integer, so the
    /// encoding cannot fail.
    fn to_json(&self) -> String {
        format!(
            r#"{{"sub":"{}","iat":{},"exp":{}}}"#,
            self.sub, self.iat, self.exp
        )
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Freshly issued credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCredential {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Encoder/decoder bound to one secret and lifetime
#[derive(Clone)]
pub struct CredentialCodec {
    secret: [u8; 32],
    ttl: Duration,
}

impl CredentialCodec {
    pub fn new(secret: [u8; 32], ttl: Duration) -> Self {
        Self { secret, ttl }
    }

    /// Issue a credential for `subject` valid from `now` for the configured
    /// lifetime. Same inputs give the same token.
    pub fn issue_at(&self, subject: UserId, now: DateTime<Utc>) -> IssuedCredential {
        let iat = now.timestamp();
        let ttl_secs = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: subject,
            iat,
            exp: iat.saturating_add(ttl_secs),
        };

        let body = to_base64url(claims.to_json().as_bytes());
        let signature = to_base64url(&hmac_sha256(&self.secret, body.as_bytes()));

        IssuedCredential {
            token: format!("{body}.{signature}"),
            expires_at: claims.expires_at(),
        }
    }

    pub fn issue(&self, subject: UserId) -> IssuedCredential {
        self.issue_at(subject, Utc::now())
    }

    /// Verify signature and structure only
    pub fn decode_ignoring_expiry(&self, token: &str) -> Result<Claims, CredentialError> {
        let (body, signature) = token.split_once('.').ok_or(CredentialError::Invalid)?;
        if body.is_empty() || signature.contains('.') {
            return Err(CredentialError::Invalid);
        }

        let signature = from_base64url(signature).map_err(|_| CredentialError::Invalid)?;
        if !verify_hmac_sha256(&self.secret, body.as_bytes(), &signature) {
            return Err(CredentialError::Invalid);
        }

        let payload = from_base64url(body).map_err(|_| CredentialError::Invalid)?;
        serde_json::from_slice(&payload).map_err(|_| CredentialError::Invalid)
    }

    /// Verify signature, structure and expiry against `now`
    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, CredentialError> {
        let claims = self.decode_ignoring_expiry(token)?;
        if claims.is_expired_at(now) {
            return Err(CredentialError::Expired);
        }
        Ok(claims)
    }

    pub fn decode(&self, token: &str) -> Result<Claims, CredentialError> {
        self.decode_at(token, Utc::now())
    }
}

impl std::fmt::Debug for CredentialCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCodec")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}
