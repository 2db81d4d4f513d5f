//! List Manager
//!
//! Custom list operations. Each call loads the owner, mutates the aggregate
//! in memory and persists the whole user; there is no list-level
//! transaction.

use chrono::Utc;
use kernel::id::{ListId, UserId};
use std::sync::Arc;

use crate::application::load_active_user;
use crate::domain::entity::custom_lists::{ListChanges, ListDraft};
use crate::domain::projection::ListView;
use crate::domain::repository::AccountStore;
use crate::domain::value_object::game::{GameId, GameRef};
use crate::error::AccountResult;

/// List manager
pub struct ListManager<S>
where
    S: AccountStore,
{
    store: Arc<S>,
}

impl<S> ListManager<S>
where
    S: AccountStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// All lists of the owner, private ones included
    pub async fn list_all(&self, owner: &UserId) -> AccountResult<Vec<ListView>> {
        let user = load_active_user(self.store.as_ref(), owner).await?;
        Ok(user.custom_lists.iter().map(Into::into).collect())
    }

    pub async fn get(&self, owner: &UserId, list_id: ListId) -> AccountResult<ListView> {
        let user = load_active_user(self.store.as_ref(), owner).await?;
        Ok(user.custom_lists.get(list_id)?.into())
    }

    pub async fn create(&self, owner: &UserId, draft: ListDraft) -> AccountResult<ListView> {
        let mut user = load_active_user(self.store.as_ref(), owner).await?;
        let now = Utc::now();

        let view = ListView::from(user.custom_lists.create(draft, now)?);
        user.touch(now);
        self.store.save(&user).await?;

        tracing::info!(user_id = %owner, list_id = %view.id, "List created");
        Ok(view)
    }

    pub async fn update(
        &self,
        owner: &UserId,
        list_id: ListId,
        changes: ListChanges,
    ) -> AccountResult<ListView> {
        let mut user = load_active_user(self.store.as_ref(), owner).await?;
        let now = Utc::now();

        let view = ListView::from(user.custom_lists.update(list_id, changes, now)?);
        user.touch(now);
        self.store.save(&user).await?;

        tracing::debug!(user_id = %owner, list_id = %list_id, "List updated");
        Ok(view)
    }

    pub async fn delete(&self, owner: &UserId, list_id: ListId) -> AccountResult<()> {
        let mut user = load_active_user(self.store.as_ref(), owner).await?;
        let now = Utc::now();

        user.custom_lists.delete(list_id)?;
        user.touch(now);
        self.store.save(&user).await?;

        tracing::info!(user_id = %owner, list_id = %list_id, "List deleted");
        Ok(())
    }

    /// Add a game; a duplicate is a silent no-op
    pub async fn add_game(
        &self,
        owner: &UserId,
        list_id: ListId,
        game: GameRef,
    ) -> AccountResult<ListView> {
        let mut user = load_active_user(self.store.as_ref(), owner).await?;
        let now = Utc::now();
        let game_id = game.game_id;

        let (list, added) = user.custom_lists.add_game(list_id, game, now)?;
        let view = ListView::from(list);

        if added {
            user.touch(now);
            self.store.save(&user).await?;
        } else {
            tracing::debug!(list_id = %list_id, game_id = %game_id, "Game already in list");
        }
        Ok(view)
    }

    /// Remove a game; an absent entry is a silent no-op
    pub async fn remove_game(
        &self,
        owner: &UserId,
        list_id: ListId,
        game_id: GameId,
    ) -> AccountResult<ListView> {
        let mut user = load_active_user(self.store.as_ref(), owner).await?;
        let now = Utc::now();

        let (list, removed) = user.custom_lists.remove_game(list_id, game_id, now)?;
        let view = ListView::from(list);

        if removed {
            user.touch(now);
            self.store.save(&user).await?;
        } else {
            tracing::debug!(list_id = %list_id, game_id = %game_id, "Game not in list");
        }
        Ok(view)
    }
}
