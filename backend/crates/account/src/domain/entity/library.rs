//! Game Library Entries
//!
//! Favorite and played-game records kept inside the user aggregate.

use chrono::{DateTime, Utc};

use crate::domain::value_object::game::{GameId, GameName, GameRef, Hours, PlayStatus, Rating};
use crate::domain::value_object::profile::WebUrl;

/// A favorite game
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteGame {
    pub game: GameRef,
    pub added_at: DateTime<Utc>,
}

/// A tracked game with play progress
#[derive(Debug, Clone, PartialEq)]
pub struct PlayedGame {
    pub game: GameRef,
    pub status: PlayStatus,
    pub rating: Option<Rating>,
    pub hours_played: Option<Hours>,
    pub added_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Partial played-game data; `None` leaves the stored value alone
#[derive(Debug, Clone)]
pub struct PlayedGameUpdate {
    pub game_id: GameId,
    pub game_name: GameName,
    pub game_image: Option<WebUrl>,
    pub status: Option<PlayStatus>,
    pub rating: Option<Rating>,
    pub hours_played: Option<Hours>,
}

impl PlayedGame {
    /// Start tracking a game; status defaults to `playing`
    pub fn start(update: PlayedGameUpdate, now: DateTime<Utc>) -> Self {
        let status = update.status.unwrap_or_default();
        Self {
            game: GameRef {
                game_id: update.game_id,
                game_name: update.game_name,
                game_image: update.game_image,
            },
            status,
            rating: update.rating,
            hours_played: update.hours_played,
            added_at: now,
            completed_at: (status == PlayStatus::Completed).then_some(now),
        }
    }

    /// Merge supplied fields in place
    pub fn merge(&mut self, update: PlayedGameUpdate, now: DateTime<Utc>) {
        self.game.game_name = update.game_name;
        if update.game_image.is_some() {
            self.game.game_image = update.game_image;
        }
        if let Some(status) = update.status {
            self.status = status;
            if status == PlayStatus::Completed {
                self.completed_at = Some(now);
            }
        }
        if update.rating.is_some() {
            self.rating = update.rating;
        }
        if update.hours_played.is_some() {
            self.hours_played = update.hours_played;
        }
    }
}
