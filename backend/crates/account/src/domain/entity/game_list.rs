//! Game List Entity
//!
//! A named, ordered collection of games owned by exactly one user.

use chrono::{DateTime, Utc};
use kernel::id::ListId;

use crate::domain::value_object::{
    game::{GameId, GameRef},
    list::{ListDescription, ListName},
};

/// One game inside a list
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub game: GameRef,
    pub added_at: DateTime<Utc>,
}

/// Game list entity
///
/// # Invariants
/// - No two entries share a `GameId`
/// - `updated_at` moves only on an accepted mutation
#[derive(Debug, Clone, PartialEq)]
pub struct GameList {
    pub list_id: ListId,
    pub name: ListName,
    pub description: ListDescription,
    pub is_public: bool,
    pub games: Vec<ListEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GameList {
    /// Create an empty list
    pub fn new(
        name: ListName,
        description: ListDescription,
        is_public: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            list_id: ListId::new(),
            name,
            description,
            is_public,
            games: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn contains(&self, game_id: GameId) -> bool {
        self.games.iter().any(|e| e.game.game_id == game_id)
    }

    /// Append a game. Returns `false` (and leaves the list untouched) if
    /// the game is already present.
    pub fn add_game(&mut self, game: GameRef, now: DateTime<Utc>) -> bool {
        if self.contains(game.game_id) {
            return false;
        }
        self.games.push(ListEntry {
            game,
            added_at: now,
        });
        self.updated_at = now;
        true
    }

    /// Remove a game. Returns `false` if nothing matched; `updated_at`
    /// only moves when an entry was removed.
    pub fn remove_game(&mut self, game_id: GameId, now: DateTime<Utc>) -> bool {
        let before = self.games.len();
        self.games.retain(|e| e.game.game_id != game_id);
        let removed = self.games.len() != before;
        if removed {
            self.updated_at = now;
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::game::GameName;
    use chrono::Duration;

    fn chess() -> GameRef {
        GameRef {
            game_id: GameId::new(42),
            game_name: GameName::new("Chess").unwrap(),
            game_image: None,
        }
    }

    fn backlog(now: DateTime<Utc>) -> GameList {
        GameList::new(
            ListName::new("Backlog").unwrap(),
            ListDescription::default(),
            false,
            now,
        )
    }

    #[test]
    fn test_new_list_is_empty() {
        let now = Utc::now();
        let list = backlog(now);
        assert!(list.games.is_empty());
        assert_eq!(list.created_at, now);
        assert_eq!(list.updated_at, now);
        assert!(!list.is_public);
    }

    #[test]
    fn test_add_game_twice_keeps_one_entry() {
        let t0 = Utc::now();
        let mut list = backlog(t0);

        assert!(list.add_game(chess(), t0 + Duration::seconds(1)));
        assert!(!list.add_game(chess(), t0 + Duration::seconds(2)));

        assert_eq!(list.games.len(), 1);
        assert_eq!(list.updated_at, t0 + Duration::seconds(1));
    }

    #[test]
    fn test_remove_absent_game_is_noop() {
        let t0 = Utc::now();
        let mut list = backlog(t0);
        assert!(!list.remove_game(GameId::new(7), t0 + Duration::seconds(5)));
        assert_eq!(list.updated_at, t0);

        list.add_game(chess(), t0);
        assert!(list.remove_game(GameId::new(42), t0 + Duration::seconds(5)));
        assert!(list.games.is_empty());
        assert_eq!(list.updated_at, t0 + Duration::seconds(5));
    }
}
