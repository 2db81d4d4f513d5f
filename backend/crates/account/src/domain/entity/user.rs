//! User Aggregate
//!
//! Identity, profile, game library, custom lists and privacy settings of a
//! single account. Every mutation goes through this type and the whole
//! aggregate is persisted at once.

use chrono::{DateTime, Duration, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::UserId;
use platform::crypto::{random_bytes, to_base64url};
use platform::password::HashedPassword;

use crate::domain::entity::custom_lists::CustomLists;
use crate::domain::entity::library::{FavoriteGame, PlayedGame, PlayedGameUpdate};
use crate::domain::value_object::{
    email::Email,
    game::{GameId, GameRef, Hours, TOTAL_HOURS_MAX},
    privacy::{ProfilePrivacy, VisibilityFlag, VisibilitySettings},
    profile::{Bio, DisplayName, Location, WebUrl},
    user_name::UserName,
};

/// Lifetime of an email verification token
const EMAIL_VERIFICATION_TTL_HOURS: i64 = 24;

/// Editable profile fields
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub display_name: DisplayName,
    pub bio: Bio,
    pub location: Location,
    pub website: Option<WebUrl>,
    pub profile_image: Option<WebUrl>,
    pub favorite_genres: Vec<String>,
    pub gaming_platforms: Vec<String>,
}

impl Profile {
    fn new(display_name: DisplayName) -> Self {
        Self {
            display_name,
            bio: Bio::default(),
            location: Location::default(),
            website: None,
            profile_image: None,
            favorite_genres: Vec::new(),
            gaming_platforms: Vec::new(),
        }
    }
}

/// Counters summarising the game library
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GameStats {
    pub total_games_played: u32,
    pub total_hours_played: Hours,
    pub achievements_unlocked: u32,
}

/// Single-use token with an expiry
#[derive(Clone, PartialEq, Eq)]
pub struct ExpiringToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl ExpiringToken {
    pub fn generate(ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            token: to_base64url(&random_bytes(32)),
            expires_at: now + ttl,
        }
    }
}

impl std::fmt::Debug for ExpiringToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpiringToken")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Fields that must never leave the service
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AccountSecrets {
    pub email_verified: bool,
    pub password_reset: Option<ExpiringToken>,
    pub email_verification: Option<ExpiringToken>,
}

/// Partial profile edit. For the URL fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub display_name: Option<DisplayName>,
    pub bio: Option<Bio>,
    pub location: Option<Location>,
    pub website: Option<Option<WebUrl>>,
    pub profile_image: Option<Option<WebUrl>>,
    pub favorite_genres: Option<Vec<String>>,
    pub gaming_platforms: Option<Vec<String>>,
}

/// Partial privacy edit
#[derive(Debug, Clone, Default)]
pub struct PrivacyChanges {
    pub profile_privacy: Option<ProfilePrivacy>,
    pub flags: Vec<(VisibilityFlag, bool)>,
}

/// User aggregate root
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub email: Email,
    pub user_name: UserName,
    pub password_hash: HashedPassword,
    pub is_active: bool,
    pub profile: Profile,
    pub favorite_games: Vec<FavoriteGame>,
    pub played_games: Vec<PlayedGame>,
    pub custom_lists: CustomLists,
    pub stats: GameStats,
    pub privacy: ProfilePrivacy,
    pub visibility: VisibilitySettings,
    pub secrets: AccountSecrets,
    pub last_login_at: Option<DateTime<Utc>>,
    pub login_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a freshly registered user. The display name defaults to the
    /// user name.
    pub fn register(
        email: Email,
        user_name: UserName,
        display_name: Option<DisplayName>,
        password_hash: HashedPassword,
        now: DateTime<Utc>,
    ) -> Self {
        let display_name =
            display_name.unwrap_or_else(|| DisplayName::from_db(user_name.original()));

        Self {
            user_id: UserId::new(),
            email,
            user_name,
            password_hash,
            is_active: true,
            profile: Profile::new(display_name),
            favorite_games: Vec::new(),
            played_games: Vec::new(),
            custom_lists: CustomLists::default(),
            stats: GameStats::default(),
            privacy: ProfilePrivacy::default(),
            visibility: VisibilitySettings::default(),
            secrets: AccountSecrets {
                email_verified: false,
                password_reset: None,
                email_verification: Some(ExpiringToken::generate(
                    Duration::hours(EMAIL_VERIFICATION_TTL_HOURS),
                    now,
                )),
            },
            last_login_at: None,
            login_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record successful login
    pub fn record_login(&mut self, now: DateTime<Utc>) {
        self.last_login_at = Some(now);
        self.login_count = self.login_count.saturating_add(1);
    }

    /// Soft-disable the account
    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.is_active = false;
        self.updated_at = now;
    }

    /// Mark the aggregate as modified
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    pub fn update_profile(&mut self, changes: ProfileChanges, now: DateTime<Utc>) {
        let profile = &mut self.profile;
        if let Some(v) = changes.display_name {
            profile.display_name = v;
        }
        if let Some(v) = changes.bio {
            profile.bio = v;
        }
        if let Some(v) = changes.location {
            profile.location = v;
        }
        if let Some(v) = changes.website {
            profile.website = v;
        }
        if let Some(v) = changes.profile_image {
            profile.profile_image = v;
        }
        if let Some(v) = changes.favorite_genres {
            profile.favorite_genres = v;
        }
        if let Some(v) = changes.gaming_platforms {
            profile.gaming_platforms = v;
        }
        self.updated_at = now;
    }

    pub fn update_privacy(&mut self, changes: PrivacyChanges, now: DateTime<Utc>) {
        if let Some(privacy) = changes.profile_privacy {
            self.privacy = privacy;
        }
        for (flag, value) in changes.flags {
            self.visibility.set(flag, value);
        }
        self.updated_at = now;
    }

    pub fn is_favorite(&self, game_id: GameId) -> bool {
        self.favorite_games.iter().any(|f| f.game.game_id == game_id)
    }

    /// Add a favorite; already present is a no-op returning `false`
    pub fn add_favorite(&mut self, game: GameRef, now: DateTime<Utc>) -> bool {
        if self.is_favorite(game.game_id) {
            return false;
        }
        self.favorite_games.push(FavoriteGame {
            game,
            added_at: now,
        });
        self.updated_at = now;
        true
    }

    /// Remove a favorite; absent is a no-op returning `false`
    pub fn remove_favorite(&mut self, game_id: GameId, now: DateTime<Utc>) -> bool {
        let before = self.favorite_games.len();
        self.favorite_games.retain(|f| f.game.game_id != game_id);
        let removed = self.favorite_games.len() != before;
        if removed {
            self.updated_at = now;
        }
        removed
    }

    /// Insert or merge a played game.
    ///
    /// A new entry bumps `total_games_played` by one. Supplied hours are
    /// always added to `total_hours_played`, for new and existing entries
    /// alike. Returns `true` if the entry is new.
    ///
    /// Fails without touching the aggregate when the total would exceed
    /// [`TOTAL_HOURS_MAX`].
    pub fn upsert_played_game(
        &mut self,
        update: PlayedGameUpdate,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        if let Some(hours) = update.hours_played {
            self.stats.total_hours_played = self
                .stats
                .total_hours_played
                .checked_add(hours)
                .ok_or_else(|| {
                    AppError::bad_request(format!(
                        "Total hours played would exceed {TOTAL_HOURS_MAX}"
                    ))
                })?;
        }

        let created = match self
            .played_games
            .iter_mut()
            .find(|p| p.game.game_id == update.game_id)
        {
            Some(existing) => {
                existing.merge(update, now);
                false
            }
            None => {
                self.played_games.push(PlayedGame::start(update, now));
                self.stats.total_games_played = self.stats.total_games_played.saturating_add(1);
                true
            }
        };
        self.updated_at = now;
        Ok(created)
    }

    /// Stop tracking a played game. The games counter drops by one (never
    /// below zero); accumulated hours stay.
    pub fn remove_played_game(&mut self, game_id: GameId, now: DateTime<Utc>) -> bool {
        let before = self.played_games.len();
        self.played_games.retain(|p| p.game.game_id != game_id);
        let removed = self.played_games.len() != before;
        if removed {
            self.stats.total_games_played = self.stats.total_games_played.saturating_sub(1);
            self.updated_at = now;
        }
        removed
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use platform::password::{ClearTextPassword, HashCost};

    /// User with a real (cheap) password hash
    pub fn user(name: &str) -> User {
        let password = ClearTextPassword::new("correct horse battery".to_string()).unwrap();
        let hash = password.hash(None, &HashCost::minimal()).unwrap();
        User::register(
            Email::new(format!("{name}@example.com")).unwrap(),
            UserName::new(name).unwrap(),
            None,
            hash,
            Utc::now(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::game::{GameName, HOURS_MAX, PlayStatus};

    fn game(id: u64) -> GameRef {
        GameRef {
            game_id: GameId::new(id),
            game_name: GameName::new("Chess").unwrap(),
            game_image: None,
        }
    }

    fn played(id: u64, hours: Option<f64>, status: Option<PlayStatus>) -> PlayedGameUpdate {
        PlayedGameUpdate {
            game_id: GameId::new(id),
            game_name: GameName::new("Chess").unwrap(),
            game_image: None,
            status,
            rating: None,
            hours_played: hours.map(|h| Hours::new(h).unwrap()),
        }
    }

    #[test]
    fn test_register_defaults() {
        let user = fixtures::user("ana");
        assert!(user.is_active);
        assert_eq!(user.profile.display_name.as_str(), "ana");
        assert_eq!(user.privacy, ProfilePrivacy::Public);
        assert!(user.secrets.email_verification.is_some());
        assert!(user.secrets.password_reset.is_none());
        assert_eq!(user.login_count, 0);
    }

    #[test]
    fn test_add_favorite_twice_is_same_as_once() {
        let mut user = fixtures::user("ana");
        let now = Utc::now();
        assert!(user.add_favorite(game(1), now));
        let once = user.favorite_games.clone();
        assert!(!user.add_favorite(game(1), now + Duration::seconds(1)));
        assert_eq!(user.favorite_games, once);
    }

    #[test]
    fn test_remove_favorite_absent_is_noop() {
        let mut user = fixtures::user("ana");
        let stamp = user.updated_at;
        assert!(!user.remove_favorite(GameId::new(9), stamp + Duration::seconds(1)));
        assert_eq!(user.updated_at, stamp);
    }

    #[test]
    fn test_hours_are_cumulative() {
        let mut user = fixtures::user("ana");
        let now = Utc::now();
        assert!(user.upsert_played_game(played(7, Some(5.0), None), now).unwrap());
        assert!(!user.upsert_played_game(played(7, Some(3.0), None), now).unwrap());

        assert_eq!(user.stats.total_hours_played.value(), 8.0);
        assert_eq!(user.stats.total_games_played, 1);
        assert_eq!(user.played_games.len(), 1);
        assert_eq!(user.played_games[0].hours_played.unwrap().value(), 3.0);
    }

    #[test]
    fn test_hours_total_overflow_is_rejected() {
        let mut user = fixtures::user("ana");
        let now = Utc::now();
        user.stats.total_hours_played = Hours::from_db(TOTAL_HOURS_MAX - 1.0);
        let before = user.clone();

        let err = user
            .upsert_played_game(played(7, Some(HOURS_MAX), None), now)
            .unwrap_err();
        assert!(err.message().contains("Total hours"));
        assert_eq!(user.stats, before.stats);
        assert!(user.played_games.is_empty());

        assert!(user.upsert_played_game(played(7, Some(1.0), None), now).unwrap());
        assert_eq!(user.stats.total_hours_played.value(), TOTAL_HOURS_MAX);
        assert!(user.stats.total_hours_played.value().is_finite());
    }

    #[test]
    fn test_upsert_completed_stamps_completion() {
        let mut user = fixtures::user("ana");
        let t0 = Utc::now();
        user.upsert_played_game(played(7, None, None), t0).unwrap();
        let t1 = t0 + Duration::days(3);
        user.upsert_played_game(played(7, None, Some(PlayStatus::Completed)), t1)
            .unwrap();
        assert_eq!(user.played_games[0].completed_at, Some(t1));
    }

    #[test]
    fn test_remove_played_game_floors_counter() {
        let mut user = fixtures::user("ana");
        let now = Utc::now();
        user.upsert_played_game(played(7, Some(2.0), None), now).unwrap();
        user.stats.total_games_played = 0;
        assert!(user.remove_played_game(GameId::new(7), now));
        assert_eq!(user.stats.total_games_played, 0);
        assert_eq!(user.stats.total_hours_played.value(), 2.0);
        assert!(!user.remove_played_game(GameId::new(7), now));
    }

    #[test]
    fn test_update_privacy_flags() {
        let mut user = fixtures::user("ana");
        user.update_privacy(
            PrivacyChanges {
                profile_privacy: Some(ProfilePrivacy::Private),
                flags: vec![(VisibilityFlag::ShowBio, false)],
            },
            Utc::now(),
        );
        assert_eq!(user.privacy, ProfilePrivacy::Private);
        assert!(!user.visibility.show_bio);
        assert!(user.visibility.show_location);
    }

    #[test]
    fn test_login_and_deactivate() {
        let mut user = fixtures::user("ana");
        let now = Utc::now();
        user.record_login(now);
        user.record_login(now);
        assert_eq!(user.login_count, 2);
        assert_eq!(user.last_login_at, Some(now));
        user.deactivate(now);
        assert!(!user.is_active);
    }
}
