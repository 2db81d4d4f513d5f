//! Session Authority
//!
//! Issues, verifies and refreshes bearer credentials. Verification alone is
//! pure; `refresh` and `authenticate` also resolve the subject through the
//! account store and require an active account.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use std::sync::Arc;

use crate::application::config::AccountConfig;
use crate::application::credential::{CredentialCodec, IssuedCredential};
use crate::domain::entity::user::User;
use crate::domain::repository::AccountStore;
use crate::error::{AccountError, AccountResult};

/// Identity attached to an authenticated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: UserId,
    pub email: String,
    pub user_name: String,
}

impl From<&User> for AuthContext {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email.as_str().to_string(),
            user_name: user.user_name.original().to_string(),
        }
    }
}

/// Session authority
pub struct SessionAuthority<S>
where
    S: AccountStore,
{
    store: Arc<S>,
    config: Arc<AccountConfig>,
    codec: CredentialCodec,
}

impl<S> SessionAuthority<S>
where
    S: AccountStore,
{
    pub fn new(store: Arc<S>, config: Arc<AccountConfig>) -> Self {
        let codec = CredentialCodec::new(config.credential_secret, config.credential_ttl);
        Self {
            store,
            config,
            codec,
        }
    }

    /// Issue a credential with a full lifetime
    pub fn issue(&self, subject: UserId) -> IssuedCredential {
        self.codec.issue(subject)
    }

    /// Check signature and expiry; does not look at the account
    pub fn verify(&self, token: &str) -> AccountResult<UserId> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> AccountResult<UserId> {
        Ok(self.codec.decode_at(token, now)?.sub)
    }

    /// Grace refresh: expiry is ignored up to the configured grace window,
    /// the account must still exist and be active.
    pub async fn refresh(&self, token: &str) -> AccountResult<IssuedCredential> {
        self.refresh_at(token, Utc::now()).await
    }

    pub async fn refresh_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> AccountResult<IssuedCredential> {
        let claims = self.codec.decode_ignoring_expiry(token)?;

        if let Some(grace) = self.config.refresh_grace {
            let grace_secs = i64::try_from(grace.as_secs()).unwrap_or(i64::MAX);
            if now.timestamp() >= claims.exp.saturating_add(grace_secs) {
                tracing::debug!(user_id = %claims.sub, "Credential past refresh grace window");
                return Err(AccountError::CredentialExpired);
            }
        }

        let user = self.active_user(&claims.sub).await?;
        let issued = self.codec.issue_at(user.user_id, now);

        tracing::info!(user_id = %user.user_id, "Credential refreshed");
        Ok(issued)
    }

    /// Verify the credential and resolve an active account
    pub async fn authenticate(&self, token: &str) -> AccountResult<AuthContext> {
        let user_id = self.verify(token)?;
        let user = self.active_user(&user_id).await?;
        Ok(AuthContext::from(&user))
    }

    async fn active_user(&self, user_id: &UserId) -> AccountResult<User> {
        match self.store.find_by_id(user_id).await? {
            Some(user) if user.is_active => Ok(user),
            Some(_) => {
                tracing::debug!(user_id = %user_id, "Credential subject is inactive");
                Err(AccountError::AccountUnavailable)
            }
            None => {
                tracing::debug!(user_id = %user_id, "Credential subject no longer exists");
                Err(AccountError::AccountUnavailable)
            }
        }
    }
}
