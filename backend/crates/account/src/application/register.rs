//! Register Use Case
//!
//! Creates a new account and signs it in.

use chrono::Utc;
use platform::password::ClearTextPassword;
use std::sync::Arc;

use crate::application::config::AccountConfig;
use crate::application::credential::IssuedCredential;
use crate::application::session_authority::{AuthContext, SessionAuthority};
use crate::domain::entity::user::User;
use crate::domain::repository::AccountStore;
use crate::domain::value_object::{email::Email, profile::DisplayName, user_name::UserName};
use crate::error::{AccountError, AccountResult};

/// Register input (already validated)
#[derive(Debug)]
pub struct RegisterInput {
    pub email: Email,
    pub user_name: UserName,
    pub password: ClearTextPassword,
    pub display_name: Option<DisplayName>,
}

/// Credential plus the identity it was issued for
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub credential: IssuedCredential,
    pub context: AuthContext,
}

/// Register use case
pub struct RegisterUseCase<S>
where
    S: AccountStore,
{
    store: Arc<S>,
    config: Arc<AccountConfig>,
}

impl<S> RegisterUseCase<S>
where
    S: AccountStore,
{
    pub fn new(store: Arc<S>, config: Arc<AccountConfig>) -> Self {
        Self { store, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AccountResult<SignedIn> {
        if self.store.find_by_email(&input.email).await?.is_some() {
            return Err(AccountError::EmailTaken);
        }
        if self
            .store
            .find_by_user_name(input.user_name.canonical())
            .await?
            .is_some()
        {
            return Err(AccountError::UserNameTaken);
        }

        let password_hash = input
            .password
            .hash(self.config.pepper(), &self.config.hash_cost)
            .map_err(|e| AccountError::Internal(e.to_string()))?;

        let now = Utc::now();
        let mut user = User::register(
            input.email,
            input.user_name,
            input.display_name,
            password_hash,
            now,
        );
        user.record_login(now);

        // Unique keys are enforced again by the store; a concurrent
        // registration surfaces here as EmailTaken / UserNameTaken.
        self.store.create(&user).await?;

        let authority = SessionAuthority::new(self.store.clone(), self.config.clone());
        let credential = authority.issue(user.user_id);

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User registered"
        );

        Ok(SignedIn {
            credential,
            context: AuthContext::from(&user),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryAccountStore;

    fn input(email: &str, name: &str) -> RegisterInput {
        RegisterInput {
            email: Email::new(email).unwrap(),
            user_name: UserName::new(name).unwrap(),
            password: ClearTextPassword::new("correct horse battery".to_string()).unwrap(),
            display_name: None,
        }
    }

    fn use_case() -> (RegisterUseCase<MemoryAccountStore>, Arc<MemoryAccountStore>) {
        let store = Arc::new(MemoryAccountStore::new());
        let uc = RegisterUseCase::new(store.clone(), Arc::new(AccountConfig::for_tests()));
        (uc, store)
    }

    #[tokio::test]
    async fn test_register_persists_hashed_user() {
        let (uc, store) = use_case();
        let out = uc.execute(input("ana@example.com", "Ana")).await.unwrap();

        let stored = store.find_by_id(&out.context.user_id).await.unwrap().unwrap();
        assert!(stored.password_hash.as_phc_string().starts_with("$argon2id$"));
        assert_eq!(stored.login_count, 1);
        assert_eq!(out.context.user_name, "Ana");
        assert!(!out.credential.token.is_empty());
    }

    #[tokio::test]
    async fn test_register_rejects_taken_email_case_insensitively() {
        let (uc, _) = use_case();
        uc.execute(input("ana@example.com", "ana")).await.unwrap();
        assert!(matches!(
            uc.execute(input("ANA@example.com", "other")).await,
            Err(AccountError::EmailTaken)
        ));
    }

    #[tokio::test]
    async fn test_register_rejects_taken_user_name_case_insensitively() {
        let (uc, _) = use_case();
        uc.execute(input("ana@example.com", "ana")).await.unwrap();
        assert!(matches!(
            uc.execute(input("b@example.com", "ANA")).await,
            Err(AccountError::UserNameTaken)
        ));
    }
}
