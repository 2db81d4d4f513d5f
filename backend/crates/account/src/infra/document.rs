//! Stored Document Shape
//!
//! The user aggregate as persisted: one JSON document per user. Kept
//! separate from the domain types so the stored format can evolve on its
//! own, and so domain types carry no serialization concerns beyond
//! their wire names.

use chrono::{DateTime, Utc};
use kernel::id::{ListId, UserId};
use platform::password::HashedPassword;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::{
    custom_lists::CustomLists,
    game_list::{GameList, ListEntry},
    library::{FavoriteGame, PlayedGame},
    user::{AccountSecrets, ExpiringToken, GameStats, Profile, User},
};
use crate::domain::value_object::{
    email::Email,
    game::{GameId, GameName, GameRef, Hours, PlayStatus, Rating},
    list::{ListDescription, ListName},
    privacy::{ProfilePrivacy, VisibilitySettings},
    profile::{Bio, DisplayName, Location, WebUrl},
    user_name::UserName,
};
use crate::error::{AccountError, AccountResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
    pub profile: ProfileDocument,
    #[serde(default)]
    pub favorite_games: Vec<FavoriteDocument>,
    #[serde(default)]
    pub played_games: Vec<PlayedDocument>,
    #[serde(default)]
    pub custom_lists: Vec<ListDocument>,
    #[serde(default)]
    pub stats: StatsDocument,
    #[serde(default)]
    pub profile_privacy: ProfilePrivacy,
    #[serde(default)]
    pub visibility: VisibilitySettings,
    #[serde(default)]
    pub secrets: SecretsDocument,
    pub last_login_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub login_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDocument {
    pub display_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub location: String,
    pub website: Option<String>,
    pub profile_image: Option<String>,
    #[serde(default)]
    pub favorite_genres: Vec<String>,
    #[serde(default)]
    pub gaming_platforms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDocument {
    pub game_id: u64,
    pub game_name: String,
    pub game_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteDocument {
    #[serde(flatten)]
    pub game: GameDocument,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayedDocument {
    #[serde(flatten)]
    pub game: GameDocument,
    pub status: PlayStatus,
    pub rating: Option<u8>,
    pub hours_played: Option<f64>,
    pub added_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocument {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub games: Vec<FavoriteDocument>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDocument {
    pub total_games_played: u32,
    pub total_hours_played: f64,
    pub achievements_unlocked: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDocument {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretsDocument {
    #[serde(default)]
    pub email_verified: bool,
    pub password_reset: Option<TokenDocument>,
    pub email_verification: Option<TokenDocument>,
}

// ============================================================================
// Domain -> Document
// ============================================================================

impl From<&GameRef> for GameDocument {
    fn from(g: &GameRef) -> Self {
        Self {
            game_id: g.game_id.value(),
            game_name: g.game_name.as_str().to_string(),
            game_image: g.game_image.as_ref().map(|u| u.as_str().to_string()),
        }
    }
}

impl From<&ExpiringToken> for TokenDocument {
    fn from(t: &ExpiringToken) -> Self {
        Self {
            token: t.token.clone(),
            expires_at: t.expires_at,
        }
    }
}

impl From<&GameList> for ListDocument {
    fn from(list: &GameList) -> Self {
        Self {
            id: list.list_id.into_uuid(),
            name: list.name.as_str().to_string(),
            description: list.description.as_str().to_string(),
            is_public: list.is_public,
            games: list
                .games
                .iter()
                .map(|e| FavoriteDocument {
                    game: (&e.game).into(),
                    added_at: e.added_at,
                })
                .collect(),
            created_at: list.created_at,
            updated_at: list.updated_at,
        }
    }
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        let p = &user.profile;
        Self {
            id: user.user_id.into_uuid(),
            email: user.email.as_str().to_string(),
            username: user.user_name.original().to_string(),
            password_hash: user.password_hash.as_phc_string().to_string(),
            is_active: user.is_active,
            profile: ProfileDocument {
                display_name: p.display_name.as_str().to_string(),
                bio: p.bio.as_str().to_string(),
                location: p.location.as_str().to_string(),
                website: p.website.as_ref().map(|u| u.as_str().to_string()),
                profile_image: p.profile_image.as_ref().map(|u| u.as_str().to_string()),
                favorite_genres: p.favorite_genres.clone(),
                gaming_platforms: p.gaming_platforms.clone(),
            },
            favorite_games: user
                .favorite_games
                .iter()
                .map(|f| FavoriteDocument {
                    game: (&f.game).into(),
                    added_at: f.added_at,
                })
                .collect(),
            played_games: user
                .played_games
                .iter()
                .map(|g| PlayedDocument {
                    game: (&g.game).into(),
                    status: g.status,
                    rating: g.rating.map(|r| r.value()),
                    hours_played: g.hours_played.map(|h| h.value()),
                    added_at: g.added_at,
                    completed_at: g.completed_at,
                })
                .collect(),
            custom_lists: user.custom_lists.iter().map(Into::into).collect(),
            stats: StatsDocument {
                total_games_played: user.stats.total_games_played,
                total_hours_played: user.stats.total_hours_played.value(),
                achievements_unlocked: user.stats.achievements_unlocked,
            },
            profile_privacy: user.privacy,
            visibility: user.visibility,
            secrets: SecretsDocument {
                email_verified: user.secrets.email_verified,
                password_reset: user.secrets.password_reset.as_ref().map(Into::into),
                email_verification: user.secrets.email_verification.as_ref().map(Into::into),
            },
            last_login_at: user.last_login_at,
            login_count: user.login_count,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ============================================================================
// Document -> Domain
// ============================================================================

fn corrupt(what: &str, detail: impl std::fmt::Display) -> AccountError {
    AccountError::Internal(format!("Corrupt stored {what}: {detail}"))
}

fn optional_url(value: Option<String>) -> Option<WebUrl> {
    value.filter(|v| !v.is_empty()).map(WebUrl::from_db)
}

impl GameDocument {
    fn into_game(self) -> GameRef {
        GameRef {
            game_id: GameId::new(self.game_id),
            game_name: GameName::from_db(self.game_name),
            game_image: optional_url(self.game_image),
        }
    }
}

impl TokenDocument {
    fn into_token(self) -> ExpiringToken {
        ExpiringToken {
            token: self.token,
            expires_at: self.expires_at,
        }
    }
}

impl PlayedDocument {
    fn into_played(self) -> AccountResult<PlayedGame> {
        let rating = self
            .rating
            .map(|r| Rating::new(i64::from(r)))
            .transpose()
            .map_err(|e| corrupt("rating", e))?;
        Ok(PlayedGame {
            game: self.game.into_game(),
            status: self.status,
            rating,
            hours_played: self.hours_played.map(Hours::from_db),
            added_at: self.added_at,
            completed_at: self.completed_at,
        })
    }
}

impl ListDocument {
    fn into_list(self) -> GameList {
        GameList {
            list_id: ListId::from_uuid(self.id),
            name: ListName::from_db(self.name),
            description: ListDescription::from_db(self.description),
            is_public: self.is_public,
            games: self
                .games
                .into_iter()
                .map(|e| ListEntry {
                    game: e.game.into_game(),
                    added_at: e.added_at,
                })
                .collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl TryFrom<UserDocument> for User {
    type Error = AccountError;

    fn try_from(doc: UserDocument) -> AccountResult<Self> {
        let password_hash =
            HashedPassword::from_phc_string(doc.password_hash).map_err(|e| corrupt("password hash", e))?;

        let played_games = doc
            .played_games
            .into_iter()
            .map(PlayedDocument::into_played)
            .collect::<AccountResult<Vec<_>>>()?;

        let p = doc.profile;
        Ok(User {
            user_id: UserId::from_uuid(doc.id),
            email: Email::from_db(doc.email),
            user_name: UserName::from_db(&doc.username),
            password_hash,
            is_active: doc.is_active,
            profile: Profile {
                display_name: DisplayName::from_db(p.display_name),
                bio: Bio::from_db(p.bio),
                location: Location::from_db(p.location),
                website: optional_url(p.website),
                profile_image: optional_url(p.profile_image),
                favorite_genres: p.favorite_genres,
                gaming_platforms: p.gaming_platforms,
            },
            favorite_games: doc
                .favorite_games
                .into_iter()
                .map(|f| FavoriteGame {
                    game: f.game.into_game(),
                    added_at: f.added_at,
                })
                .collect(),
            played_games,
            custom_lists: CustomLists::from_db(
                doc.custom_lists.into_iter().map(ListDocument::into_list).collect(),
            ),
            stats: GameStats {
                total_games_played: doc.stats.total_games_played,
                total_hours_played: Hours::from_db(doc.stats.total_hours_played),
                achievements_unlocked: doc.stats.achievements_unlocked,
            },
            privacy: doc.profile_privacy,
            visibility: doc.visibility,
            secrets: AccountSecrets {
                email_verified: doc.secrets.email_verified,
                password_reset: doc.secrets.password_reset.map(TokenDocument::into_token),
                email_verification: doc.secrets.email_verification.map(TokenDocument::into_token),
            },
            last_login_at: doc.last_login_at,
            login_count: doc.login_count,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }
}
