//! Profile Service
//!
//! Public lookups through the projector, plus the owner's own profile and
//! privacy edits.

use chrono::Utc;
use kernel::id::UserId;
use std::sync::Arc;

use crate::application::config::AccountConfig;
use crate::application::load_active_user;
use crate::domain::entity::user::{PrivacyChanges, ProfileChanges, User};
use crate::domain::projection::{self, ProfileView, SelfView, Viewer};
use crate::domain::repository::AccountStore;
use crate::domain::value_object::user_name::UserName;
use crate::error::{AccountError, AccountResult};

/// Search terms longer than this are rejected
pub const SEARCH_TERM_MAX_LENGTH: usize = 50;

/// Profile service
pub struct ProfileService<S>
where
    S: AccountStore,
{
    store: Arc<S>,
    config: Arc<AccountConfig>,
}

impl<S> ProfileService<S>
where
    S: AccountStore,
{
    pub fn new(store: Arc<S>, config: Arc<AccountConfig>) -> Self {
        Self { store, config }
    }

    /// Look up by user id or user name and project for `viewer`
    pub async fn public_profile(&self, id_or_name: &str, viewer: Viewer) -> AccountResult<ProfileView> {
        let user = match id_or_name.parse::<UserId>() {
            Ok(user_id) => self.store.find_by_id(&user_id).await?,
            Err(_) => {
                self.store
                    .find_by_user_name(&UserName::canonicalize(id_or_name))
                    .await?
            }
        };

        let user = user
            .filter(|u| u.is_active)
            .ok_or(AccountError::NotFound("User"))?;

        Ok(projection::project(&user, viewer))
    }

    /// Active users matching `term`, each projected for `viewer`
    pub async fn search(&self, term: &str, viewer: Viewer) -> AccountResult<Vec<ProfileView>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(AccountError::validation("q", "Search term cannot be empty"));
        }
        if term.chars().count() > SEARCH_TERM_MAX_LENGTH {
            return Err(AccountError::validation(
                "q",
                format!("Search term must be at most {SEARCH_TERM_MAX_LENGTH} characters"),
            ));
        }

        let users = self.store.search(term, self.config.search_limit).await?;
        Ok(users
            .iter()
            .filter(|u| u.is_active)
            .map(|u| projection::project(u, viewer))
            .collect())
    }

    /// The owner's dashboard view
    pub async fn self_view(&self, user_id: &UserId) -> AccountResult<SelfView> {
        let user = load_active_user(self.store.as_ref(), user_id).await?;
        Ok(projection::self_view(&user))
    }

    pub async fn update_profile(
        &self,
        user_id: &UserId,
        changes: ProfileChanges,
    ) -> AccountResult<SelfView> {
        self.mutate(user_id, |user| user.update_profile(changes, Utc::now()))
            .await
    }

    pub async fn update_privacy(
        &self,
        user_id: &UserId,
        changes: PrivacyChanges,
    ) -> AccountResult<SelfView> {
        let view = self
            .mutate(user_id, |user| user.update_privacy(changes, Utc::now()))
            .await?;
        tracing::info!(user_id = %user_id, privacy = %view.profile.profile_privacy, "Privacy updated");
        Ok(view)
    }

    /// Soft-disable the account. Existing credentials stop working at the
    /// next authentication.
    pub async fn deactivate(&self, user_id: &UserId) -> AccountResult<()> {
        let mut user = load_active_user(self.store.as_ref(), user_id).await?;
        user.deactivate(Utc::now());
        self.store.save(&user).await?;
        tracing::info!(user_id = %user_id, "Account deactivated");
        Ok(())
    }

    async fn mutate(&self, user_id: &UserId, f: impl FnOnce(&mut User)) -> AccountResult<SelfView> {
        let mut user = load_active_user(self.store.as_ref(), user_id).await?;
        f(&mut user);
        self.store.save(&user).await?;
        Ok(projection::self_view(&user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::user::fixtures;
    use crate::domain::value_object::privacy::{ProfilePrivacy, VisibilityFlag};
    use crate::domain::value_object::profile::Bio;
    use crate::infra::memory::MemoryAccountStore;

    async fn setup() -> (ProfileService<MemoryAccountStore>, Arc<MemoryAccountStore>, User) {
        let store = Arc::new(MemoryAccountStore::new());
        let user = fixtures::user("ana");
        store.create(&user).await.unwrap();
        let service = ProfileService::new(store.clone(), Arc::new(AccountConfig::for_tests()));
        (service, store, user)
    }

    #[tokio::test]
    async fn test_lookup_by_id_and_user_name() {
        let (service, _, user) = setup().await;
        let by_id = service
            .public_profile(&user.user_id.to_string(), Viewer::Anonymous)
            .await
            .unwrap();
        let by_name = service
            .public_profile("ANA", Viewer::Anonymous)
            .await
            .unwrap();
        assert_eq!(by_id.id(), user.user_id);
        assert_eq!(by_name.id(), user.user_id);
    }

    #[tokio::test]
    async fn test_unknown_or_inactive_is_not_found() {
        let (service, store, mut user) = setup().await;
        assert!(matches!(
            service.public_profile("nobody", Viewer::Anonymous).await,
            Err(AccountError::NotFound("User"))
        ));

        user.deactivate(Utc::now());
        store.save(&user).await.unwrap();
        assert!(matches!(
            service.public_profile("ana", Viewer::Anonymous).await,
            Err(AccountError::NotFound("User"))
        ));
        assert!(service.search("an", Viewer::Anonymous).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_validates_term() {
        let (service, _, _) = setup().await;
        assert!(matches!(
            service.search("  ", Viewer::Anonymous).await,
            Err(AccountError::Validation(_))
        ));
        assert_eq!(service.search("AN", Viewer::Anonymous).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_profile_and_privacy_persist() {
        let (service, store, user) = setup().await;
        service
            .update_profile(
                &user.user_id,
                ProfileChanges {
                    bio: Some(Bio::new("hi").unwrap()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let view = service
            .update_privacy(
                &user.user_id,
                PrivacyChanges {
                    profile_privacy: Some(ProfilePrivacy::Friends),
                    flags: vec![(VisibilityFlag::ShowEmail, true)],
                },
            )
            .await
            .unwrap();
        assert_eq!(view.profile.bio.as_deref(), Some("hi"));
        assert!(view.visibility.show_email);

        let stored = store.find_by_id(&user.user_id).await.unwrap().unwrap();
        assert_eq!(stored.privacy, ProfilePrivacy::Friends);
        assert_eq!(stored.profile.bio.as_str(), "hi");
    }

    #[tokio::test]
    async fn test_deactivate_then_mutations_fail() {
        let (service, _, user) = setup().await;
        service.deactivate(&user.user_id).await.unwrap();
        assert!(matches!(
            service.self_view(&user.user_id).await,
            Err(AccountError::AccountUnavailable)
        ));
    }
}
