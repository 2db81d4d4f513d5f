//! Login Use Case
//!
//! Exchanges email-or-user-name plus password for a credential.

use chrono::Utc;
use platform::password::ClearTextPassword;
use std::sync::Arc;

use crate::application::config::AccountConfig;
use crate::application::register::SignedIn;
use crate::application::session_authority::{AuthContext, SessionAuthority};
use crate::domain::entity::user::User;
use crate::domain::repository::AccountStore;
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::{AccountError, AccountResult};

/// Login input
pub struct LoginInput {
    /// Email if it contains `@`, user name otherwise
    pub identifier: String,
    pub password: String,
}

/// Login use case
pub struct LoginUseCase<S>
where
    S: AccountStore,
{
    store: Arc<S>,
    config: Arc<AccountConfig>,
}

impl<S> LoginUseCase<S>
where
    S: AccountStore,
{
    pub fn new(store: Arc<S>, config: Arc<AccountConfig>) -> Self {
        Self { store, config }
    }

    pub async fn execute(&self, input: LoginInput) -> AccountResult<SignedIn> {
        let found = self.find_user(&input.identifier).await?;
        let password = ClearTextPassword::for_verification(input.password);

        // A miss pays one Argon2 derivation at the configured cost, the
        // same as verifying a stored hash.
        let Some(user) = found else {
            let _ = password.hash(self.config.pepper(), &self.config.hash_cost);
            return Err(AccountError::InvalidLogin);
        };
        let verified = user.password_hash.verify(&password, self.config.pepper());
        if !verified || !user.is_active {
            return Err(AccountError::InvalidLogin);
        }

        // Login statistics are best effort: a failed write does not fail
        // the login.
        let mut user = user;
        user.record_login(Utc::now());
        if let Err(e) = self.store.save(&user).await {
            tracing::warn!(user_id = %user.user_id, error = %e, "Failed to record login");
        }

        let authority = SessionAuthority::new(self.store.clone(), self.config.clone());
        let credential = authority.issue(user.user_id);

        tracing::info!(user_id = %user.user_id, "User logged in");

        Ok(SignedIn {
            credential,
            context: AuthContext::from(&user),
        })
    }

    async fn find_user(&self, identifier: &str) -> AccountResult<Option<User>> {
        if identifier.contains('@') {
            match Email::new(identifier) {
                Ok(email) => self.store.find_by_email(&email).await,
                Err(_) => Ok(None),
            }
        } else {
            self.store
                .find_by_user_name(&UserName::canonicalize(identifier))
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::register::{RegisterInput, RegisterUseCase};
    use crate::application::config::HashCost;
    use crate::infra::memory::MemoryAccountStore;
    use std::time::Instant;

    async fn setup() -> (LoginUseCase<MemoryAccountStore>, Arc<MemoryAccountStore>) {
        setup_with(AccountConfig::for_tests()).await
    }

    async fn setup_with(
        config: AccountConfig,
    ) -> (LoginUseCase<MemoryAccountStore>, Arc<MemoryAccountStore>) {
        let store = Arc::new(MemoryAccountStore::new());
        let config = Arc::new(config);
        RegisterUseCase::new(store.clone(), config.clone())
            .execute(RegisterInput {
                email: Email::new("ana@example.com").unwrap(),
                user_name: UserName::new("Ana").unwrap(),
                password: ClearTextPassword::new("correct horse battery".to_string()).unwrap(),
                display_name: None,
            })
            .await
            .unwrap();
        (LoginUseCase::new(store.clone(), config), store)
    }

    fn login(identifier: &str, password: &str) -> LoginInput {
        LoginInput {
            identifier: identifier.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_by_email_or_user_name() {
        let (uc, store) = setup().await;
        let by_email = uc
            .execute(login("ANA@example.com", "correct horse battery"))
            .await
            .unwrap();
        let by_name = uc
            .execute(login("ana", "correct horse battery"))
            .await
            .unwrap();
        assert_eq!(by_email.context.user_id, by_name.context.user_id);

        let stored = store
            .find_by_id(&by_name.context.user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.login_count, 3);
        assert!(stored.last_login_at.is_some());
    }

    #[tokio::test]
    async fn test_login_failures_are_uniform() {
        let (uc, _) = setup().await;
        for (identifier, password) in [
            ("ana", "wrong password!"),
            ("nobody", "correct horse battery"),
            ("nobody@example.com", "correct horse battery"),
            ("bad@", "correct horse battery"),
        ] {
            assert!(matches!(
                uc.execute(login(identifier, password)).await,
                Err(AccountError::InvalidLogin)
            ));
        }
    }

    #[tokio::test]
    async fn test_inactive_account_cannot_login() {
        let (uc, store) = setup().await;
        let mut user = store.find_by_user_name("ana").await.unwrap().unwrap();
        user.deactivate(Utc::now());
        store.save(&user).await.unwrap();

        assert!(matches!(
            uc.execute(login("ana", "correct horse battery")).await,
            Err(AccountError::InvalidLogin)
        ));
    }

    #[tokio::test]
    async fn test_unknown_identifier_costs_a_hash() {
        let config = AccountConfig {
            hash_cost: HashCost {
                memory_kib: 8 * 1024,
                iterations: 3,
                parallelism: 1,
            },
            ..AccountConfig::for_tests()
        };
        let (uc, _) = setup_with(config).await;

        let started = Instant::now();
        let wrong = uc.execute(login("ana", "wrong password!")).await;
        let hit = started.elapsed();

        let started = Instant::now();
        let unknown = uc.execute(login("nobody", "wrong password!")).await;
        let miss = started.elapsed();

        assert!(matches!(wrong, Err(AccountError::InvalidLogin)));
        assert!(matches!(unknown, Err(AccountError::InvalidLogin)));
        assert!(
            miss * 4 >= hit,
            "miss took {miss:?}, wrong password took {hit:?}"
        );
    }
}
