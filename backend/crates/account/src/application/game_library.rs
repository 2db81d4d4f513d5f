//! Game Library
//!
//! Favorite and played-game tracking on the user aggregate.

use chrono::Utc;
use kernel::id::UserId;
use serde::Serialize;
use std::sync::Arc;

use crate::application::load_active_user;
use crate::domain::entity::library::PlayedGameUpdate;
use crate::domain::entity::user::User;
use crate::domain::projection::view::{FavoriteGameView, PlayedGameView};
use crate::domain::repository::AccountStore;
use crate::domain::value_object::game::{GameId, GameRef};
use crate::error::{AccountError, AccountResult};

/// The owner's library after a change
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryView {
    pub favorite_games: Vec<FavoriteGameView>,
    pub played_games: Vec<PlayedGameView>,
    pub total_games_played: u32,
    pub total_hours_played: f64,
}

impl From<&User> for LibraryView {
    fn from(user: &User) -> Self {
        Self {
            favorite_games: user.favorite_games.iter().map(Into::into).collect(),
            played_games: user.played_games.iter().map(Into::into).collect(),
            total_games_played: user.stats.total_games_played,
            total_hours_played: user.stats.total_hours_played.value(),
        }
    }
}

/// Game library service
pub struct GameLibrary<S>
where
    S: AccountStore,
{
    store: Arc<S>,
}

impl<S> GameLibrary<S>
where
    S: AccountStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Add a favorite; already present is a no-op
    pub async fn add_favorite(&self, user_id: &UserId, game: GameRef) -> AccountResult<LibraryView> {
        let game_id = game.game_id;
        self.mutate(user_id, |user| {
            let added = user.add_favorite(game, Utc::now());
            if !added {
                tracing::debug!(user_id = %user_id, game_id = %game_id, "Favorite already present");
            }
            Ok(added)
        })
        .await
    }

    /// Remove a favorite; absent is a no-op
    pub async fn remove_favorite(
        &self,
        user_id: &UserId,
        game_id: GameId,
    ) -> AccountResult<LibraryView> {
        self.mutate(user_id, |user| Ok(user.remove_favorite(game_id, Utc::now())))
            .await
    }

    /// Insert or merge a played game
    pub async fn upsert_played_game(
        &self,
        user_id: &UserId,
        update: PlayedGameUpdate,
    ) -> AccountResult<LibraryView> {
        self.mutate(user_id, |user| {
            let created = user
                .upsert_played_game(update, Utc::now())
                .map_err(|e| AccountError::validation("hoursPlayed", e.message().to_string()))?;
            tracing::debug!(user_id = %user_id, created, "Played game upserted");
            Ok(true)
        })
        .await
    }

    /// Stop tracking a played game; absent is a no-op
    pub async fn remove_played_game(
        &self,
        user_id: &UserId,
        game_id: GameId,
    ) -> AccountResult<LibraryView> {
        self.mutate(user_id, |user| {
            Ok(user.remove_played_game(game_id, Utc::now()))
        })
            .await
    }

    /// Load, apply `f`, persist only if `f` reports a change
    async fn mutate(
        &self,
        user_id: &UserId,
        f: impl FnOnce(&mut User) -> AccountResult<bool>,
    ) -> AccountResult<LibraryView> {
        let mut user = load_active_user(self.store.as_ref(), user_id).await?;
        if f(&mut user)? {
            self.store.save(&user).await?;
        }
        Ok(LibraryView::from(&user))
    }
}
