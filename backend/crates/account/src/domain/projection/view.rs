//! Projected Views
//!
//! Output shapes of the profile projection. None of these types has a
//! field for the password hash or any token, so secrets cannot be
//! serialized through them.

use chrono::{DateTime, Utc};
use kernel::id::{ListId, UserId};
use serde::Serialize;

use crate::domain::entity::{
    game_list::{GameList, ListEntry},
    library::{FavoriteGame, PlayedGame},
};
use crate::domain::value_object::{
    game::{GameId, GameRef, PlayStatus},
    privacy::{ProfilePrivacy, VisibilitySettings},
};

/// Cached catalogue reference as rendered to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRefView {
    pub game_id: GameId,
    pub game_name: String,
    pub game_image: Option<String>,
}

impl From<&GameRef> for GameRefView {
    fn from(game: &GameRef) -> Self {
        Self {
            game_id: game.game_id,
            game_name: game.game_name.as_str().to_string(),
            game_image: game.game_image.as_ref().map(|u| u.as_str().to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteGameView {
    #[serde(flatten)]
    pub game: GameRefView,
    pub added_at: DateTime<Utc>,
}

impl From<&FavoriteGame> for FavoriteGameView {
    fn from(f: &FavoriteGame) -> Self {
        Self {
            game: (&f.game).into(),
            added_at: f.added_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayedGameView {
    #[serde(flatten)]
    pub game: GameRefView,
    pub status: PlayStatus,
    pub rating: Option<u8>,
    pub hours_played: Option<f64>,
    pub added_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<&PlayedGame> for PlayedGameView {
    fn from(p: &PlayedGame) -> Self {
        Self {
            game: (&p.game).into(),
            status: p.status,
            rating: p.rating.map(|r| r.value()),
            hours_played: p.hours_played.map(|h| h.value()),
            added_at: p.added_at,
            completed_at: p.completed_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntryView {
    #[serde(flatten)]
    pub game: GameRefView,
    pub added_at: DateTime<Utc>,
}

impl From<&ListEntry> for ListEntryView {
    fn from(e: &ListEntry) -> Self {
        Self {
            game: (&e.game).into(),
            added_at: e.added_at,
        }
    }
}

/// A custom list as rendered to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    pub id: ListId,
    pub name: String,
    pub description: String,
    pub is_public: bool,
    pub game_count: usize,
    pub games: Vec<ListEntryView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&GameList> for ListView {
    fn from(list: &GameList) -> Self {
        Self {
            id: list.list_id,
            name: list.name.as_str().to_string(),
            description: list.description.as_str().to_string(),
            is_public: list.is_public,
            game_count: list.games.len(),
            games: list.games.iter().map(Into::into).collect(),
            created_at: list.created_at,
            updated_at: list.updated_at,
        }
    }
}

/// Minimal shape returned for `private` and `friends` tiers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestrictedProfile {
    pub id: UserId,
    pub username: String,
    pub display_name: String,
    pub profile_image: Option<String>,
    pub profile_privacy: ProfilePrivacy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_friends_only: Option<bool>,
}

/// Counts over the post-filter collections. `None` means the collection
/// is hidden, which is different from an empty collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_games_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub played_games_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_games_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_lists_count: Option<usize>,
}

/// Profile with per-field filtering applied. Hidden fields are `None` and
/// are omitted from the JSON entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleProfile {
    pub id: UserId,
    pub username: String,
    pub display_name: String,
    pub profile_image: Option<String>,
    pub profile_privacy: ProfilePrivacy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub website: Option<String>,
    pub favorite_genres: Vec<String>,
    pub gaming_platforms: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_games_played: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_hours_played: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achievements_unlocked: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_games: Option<Vec<FavoriteGameView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub played_games: Option<Vec<PlayedGameView>>,
    pub custom_lists: Vec<ListView>,
    pub stats: ProfileStats,
    pub created_at: DateTime<Utc>,
}

/// Result of projecting a profile for a viewer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProfileView {
    Restricted(RestrictedProfile),
    Visible(Box<VisibleProfile>),
}

impl ProfileView {
    pub fn id(&self) -> UserId {
        match self {
            ProfileView::Restricted(p) => p.id,
            ProfileView::Visible(p) => p.id,
        }
    }
}

/// The owner's own dashboard: every field, private lists included, plus
/// account settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfView {
    #[serde(flatten)]
    pub profile: VisibleProfile,
    pub email_verified: bool,
    pub visibility: VisibilitySettings,
    pub login_count: u64,
    pub last_login_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}
