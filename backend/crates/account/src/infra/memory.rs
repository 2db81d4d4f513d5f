//! In-Memory Account Store
//!
//! Documents keyed by user id, with secondary indexes on email and
//! canonical user name. Used by tests and by the API when no database is
//! configured.

use std::collections::HashMap;
use std::sync::Arc;

use kernel::id::UserId;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entity::user::User;
use crate::domain::repository::AccountStore;
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::{AccountError, AccountResult};
use crate::infra::document::UserDocument;

#[derive(Default)]
struct MemoryState {
    documents: HashMap<Uuid, UserDocument>,
    by_email: HashMap<String, Uuid>,
    by_user_name: HashMap<String, Uuid>,
}

impl MemoryState {
    fn load(&self, id: Option<&Uuid>) -> AccountResult<Option<User>> {
        id.and_then(|id| self.documents.get(id))
            .cloned()
            .map(User::try_from)
            .transpose()
    }

    fn taken_by_other(index: &HashMap<String, Uuid>, key: &str, owner: Uuid) -> bool {
        index.get(key).is_some_and(|id| *id != owner)
    }
}

#[derive(Clone, Default)]
pub struct MemoryAccountStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.state.read().await.documents.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl AccountStore for MemoryAccountStore {
    async fn create(&self, user: &User) -> AccountResult<()> {
        let mut state = self.state.write().await;
        let id = user.user_id.into_uuid();
        let email = user.email.as_str().to_string();
        let user_name = user.user_name.canonical().to_string();

        if state.by_email.contains_key(&email) {
            return Err(AccountError::EmailTaken);
        }
        if state.by_user_name.contains_key(&user_name) {
            return Err(AccountError::UserNameTaken);
        }
        if state.documents.contains_key(&id) {
            return Err(AccountError::Conflict);
        }

        state.by_email.insert(email, id);
        state.by_user_name.insert(user_name, id);
        state.documents.insert(id, UserDocument::from(user));
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AccountResult<Option<User>> {
        let state = self.state.read().await;
        state.load(Some(user_id.as_uuid()))
    }

    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<User>> {
        let state = self.state.read().await;
        state.load(state.by_email.get(email.as_str()))
    }

    async fn find_by_user_name(&self, canonical: &str) -> AccountResult<Option<User>> {
        let state = self.state.read().await;
        state.load(state.by_user_name.get(canonical))
    }

    async fn save(&self, user: &User) -> AccountResult<()> {
        let mut state = self.state.write().await;
        let id = user.user_id.into_uuid();
        let Some(previous) = state.documents.get(&id) else {
            return Err(AccountError::NotFound("User"));
        };

        let old_email = previous.email.clone();
        let old_user_name = UserName::canonicalize(&previous.username);
        let email = user.email.as_str().to_string();
        let user_name = user.user_name.canonical().to_string();

        if MemoryState::taken_by_other(&state.by_email, &email, id) {
            return Err(AccountError::EmailTaken);
        }
        if MemoryState::taken_by_other(&state.by_user_name, &user_name, id) {
            return Err(AccountError::UserNameTaken);
        }

        state.by_email.remove(&old_email);
        state.by_user_name.remove(&old_user_name);
        state.by_email.insert(email, id);
        state.by_user_name.insert(user_name, id);
        state.documents.insert(id, UserDocument::from(user));
        Ok(())
    }

    async fn search(&self, term: &str, limit: usize) -> AccountResult<Vec<User>> {
        let needle = term.to_lowercase();
        let state = self.state.read().await;

        let mut matches: Vec<&UserDocument> = state
            .documents
            .values()
            .filter(|doc| doc.is_active)
            .filter(|doc| {
                doc.username.to_lowercase().contains(&needle)
                    || doc.profile.display_name.to_lowercase().contains(&needle)
            })
            .collect();
        matches.sort_by_key(|doc| doc.username.to_lowercase());

        matches
            .into_iter()
            .take(limit)
            .cloned()
            .map(User::try_from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::user::fixtures;
    use chrono::Utc;

    #[tokio::test]
    async fn test_create_and_find_by_every_key() {
        let store = MemoryAccountStore::new();
        let user = fixtures::user("Ana_B");
        store.create(&user).await.unwrap();

        let by_id = store.find_by_id(&user.user_id).await.unwrap().unwrap();
        assert_eq!(by_id.user_name.original(), "Ana_B");

        let by_email = store.find_by_email(&user.email).await.unwrap().unwrap();
        assert_eq!(by_email.user_id, user.user_id);

        let by_name = store.find_by_user_name("ana_b").await.unwrap().unwrap();
        assert_eq!(by_name.user_id, user.user_id);

        assert!(store.find_by_id(&UserId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_taken_keys() {
        let store = MemoryAccountStore::new();
        let ana = fixtures::user("ana");
        store.create(&ana).await.unwrap();

        let mut same_email = fixtures::user("other");
        same_email.email = ana.email.clone();
        assert!(matches!(
            store.create(&same_email).await,
            Err(AccountError::EmailTaken)
        ));

        let mut same_name = fixtures::user("ANA");
        same_name.email = Email::new("someone@example.com").unwrap();
        assert!(matches!(
            store.create(&same_name).await,
            Err(AccountError::UserNameTaken)
        ));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_save_requires_existing_user() {
        let store = MemoryAccountStore::new();
        let user = fixtures::user("ana");
        assert!(matches!(
            store.save(&user).await,
            Err(AccountError::NotFound("User"))
        ));
    }

    #[tokio::test]
    async fn test_save_moves_indexes() {
        let store = MemoryAccountStore::new();
        let mut user = fixtures::user("ana");
        store.create(&user).await.unwrap();

        user.user_name = UserName::new("ana_renamed").unwrap();
        user.touch(Utc::now());
        store.save(&user).await.unwrap();

        assert!(store.find_by_user_name("ana").await.unwrap().is_none());
        assert!(store.find_by_user_name("ana_renamed").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_sorted_and_limited() {
        let store = MemoryAccountStore::new();
        for name in ["zelda_fan", "Link_Main", "ganon", "linkle"] {
            store.create(&fixtures::user(name)).await.unwrap();
        }
        let mut inactive = fixtures::user("link_old");
        inactive.deactivate(Utc::now());
        store.create(&inactive).await.unwrap();

        let found = store.search("LINK", 10).await.unwrap();
        let names: Vec<&str> = found.iter().map(|u| u.user_name.original()).collect();
        assert_eq!(names, vec!["Link_Main", "linkle"]);

        assert_eq!(store.search("LINK", 1).await.unwrap().len(), 1);
    }
}
