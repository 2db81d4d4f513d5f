//! Profile Projector
//!
//! Pure functions from a user aggregate and a viewer to a view. Total over
//! every well-formed user; no I/O.

use kernel::id::UserId;

use crate::domain::entity::{game_list::GameList, user::User};
use crate::domain::projection::rules::{ProfileField, hidden_fields};
use crate::domain::projection::view::{
    ProfileStats, ProfileView, RestrictedProfile, SelfView, VisibleProfile,
};
use crate::domain::value_object::{game::PlayStatus, privacy::ProfilePrivacy};

/// Who is looking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Viewer {
    #[default]
    Anonymous,
    User(UserId),
}

impl Viewer {
    pub fn is_owner_of(&self, user_id: UserId) -> bool {
        matches!(self, Viewer::User(id) if *id == user_id)
    }
}

/// Project `user` for `viewer`.
///
/// The owner passes the tier gate, but still gets per-field filtering and
/// public lists only: this view is what others see.
pub fn project(user: &User, viewer: Viewer) -> ProfileView {
    match tier_gate(user, viewer) {
        Some(restricted) => ProfileView::Restricted(restricted),
        None => ProfileView::Visible(Box::new(filter_fields(user))),
    }
}

/// Unfiltered view for the owner's own dashboard
pub fn self_view(user: &User) -> SelfView {
    let mut profile = full_profile(user, user.custom_lists.iter());
    profile.stats = stats(&profile, true);
    SelfView {
        profile,
        email_verified: user.secrets.email_verified,
        visibility: user.visibility,
        login_count: user.login_count,
        last_login_at: user.last_login_at,
        updated_at: user.updated_at,
    }
}

/// Phase 1: blanket tier
fn tier_gate(user: &User, viewer: Viewer) -> Option<RestrictedProfile> {
    if viewer.is_owner_of(user.user_id) {
        return None;
    }
    let (is_private, is_friends_only) = match user.privacy {
        ProfilePrivacy::Public => return None,
        ProfilePrivacy::Private => (Some(true), None),
        ProfilePrivacy::Friends => (None, Some(true)),
    };
    Some(RestrictedProfile {
        id: user.user_id,
        username: user.user_name.original().to_string(),
        display_name: user.profile.display_name.as_str().to_string(),
        profile_image: image_of(user),
        profile_privacy: user.privacy,
        is_private,
        is_friends_only,
    })
}

/// Phase 2: per-field toggles, then public lists only
fn filter_fields(user: &User) -> VisibleProfile {
    let mut view = full_profile(user, user.custom_lists.iter().filter(|l| l.is_public));
    let mut lists_shown = true;

    for field in hidden_fields(&user.visibility) {
        match field {
            ProfileField::Email => view.email = None,
            ProfileField::Bio => view.bio = None,
            ProfileField::Location => view.location = None,
            ProfileField::TotalGamesPlayed => view.total_games_played = None,
            ProfileField::TotalHoursPlayed => view.total_hours_played = None,
            ProfileField::AchievementsUnlocked => view.achievements_unlocked = None,
            ProfileField::FavoriteGames => view.favorite_games = None,
            ProfileField::PlayedGames => view.played_games = None,
            ProfileField::CustomLists => {
                view.custom_lists.clear();
                lists_shown = false;
            }
        }
    }

    view.stats = stats(&view, lists_shown);
    view
}

fn image_of(user: &User) -> Option<String> {
    user.profile
        .profile_image
        .as_ref()
        .map(|u| u.as_str().to_string())
}

fn full_profile<'a>(user: &User, lists: impl Iterator<Item = &'a GameList>) -> VisibleProfile {
    let profile = &user.profile;
    VisibleProfile {
        id: user.user_id,
        username: user.user_name.original().to_string(),
        display_name: profile.display_name.as_str().to_string(),
        profile_image: image_of(user),
        profile_privacy: user.privacy,
        email: Some(user.email.as_str().to_string()),
        bio: Some(profile.bio.as_str().to_string()),
        location: Some(profile.location.as_str().to_string()),
        website: profile.website.as_ref().map(|u| u.as_str().to_string()),
        favorite_genres: profile.favorite_genres.clone(),
        gaming_platforms: profile.gaming_platforms.clone(),
        total_games_played: Some(user.stats.total_games_played),
        total_hours_played: Some(user.stats.total_hours_played.value()),
        achievements_unlocked: Some(user.stats.achievements_unlocked),
        favorite_games: Some(user.favorite_games.iter().map(Into::into).collect()),
        played_games: Some(user.played_games.iter().map(Into::into).collect()),
        custom_lists: lists.map(Into::into).collect(),
        stats: ProfileStats::default(),
        created_at: user.created_at,
    }
}

/// Counts over what survived filtering
fn stats(view: &VisibleProfile, lists_shown: bool) -> ProfileStats {
    ProfileStats {
        favorite_games_count: view.favorite_games.as_ref().map(Vec::len),
        played_games_count: view.played_games.as_ref().map(Vec::len),
        completed_games_count: view.played_games.as_ref().map(|games| {
            games
                .iter()
                .filter(|g| g.status == PlayStatus::Completed)
                .count()
        }),
        custom_lists_count: lists_shown.then_some(view.custom_lists.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::custom_lists::ListDraft;
    use crate::domain::entity::user::fixtures;
    use crate::domain::value_object::game::{GameId, GameName, GameRef};
    use crate::domain::value_object::privacy::{VisibilityFlag, VisibilitySettings};
    use crate::domain::value_object::profile::Bio;
    use chrono::Utc;

    fn all_flag_combinations() -> impl Iterator<Item = VisibilitySettings> {
        (0u32..(1 << VisibilityFlag::ALL.len())).map(|bits| {
            let mut settings = VisibilitySettings::default();
            for (i, flag) in VisibilityFlag::ALL.iter().enumerate() {
                settings.set(*flag, bits & (1 << i) != 0);
            }
            settings
        })
    }

    fn populated_user() -> User {
        let mut user = fixtures::user("ana");
        let now = Utc::now();
        user.profile.bio = Bio::new("hi").unwrap();
        user.add_favorite(
            GameRef {
                game_id: GameId::new(1),
                game_name: GameName::new("Chess").unwrap(),
                game_image: None,
            },
            now,
        );
        user.custom_lists
            .create(ListDraft::parse("Public", None, Some(true)).unwrap(), now)
            .unwrap();
        user.custom_lists
            .create(ListDraft::parse("Secret", None, Some(false)).unwrap(), now)
            .unwrap();
        user
    }

    fn json(view: &impl serde::Serialize) -> serde_json::Value {
        serde_json::to_value(view).unwrap()
    }

    #[test]
    fn test_secrets_never_projected() {
        let mut user = populated_user();
        let reset = user.secrets.email_verification.clone().unwrap();
        user.secrets.password_reset = Some(reset.clone());
        let hash = user.password_hash.as_phc_string().to_string();

        for privacy in [
            ProfilePrivacy::Public,
            ProfilePrivacy::Friends,
            ProfilePrivacy::Private,
        ] {
            user.privacy = privacy;
            for settings in all_flag_combinations() {
                user.visibility = settings;
                for viewer in [Viewer::Anonymous, Viewer::User(user.user_id)] {
                    let text = serde_json::to_string(&project(&user, viewer)).unwrap();
                    assert!(!text.contains(&hash));
                    assert!(!text.contains(&reset.token));
                    assert!(!text.contains("password"));
                    assert!(!text.contains("Token"));
                }
            }
        }

        let text = serde_json::to_string(&self_view(&user)).unwrap();
        assert!(!text.contains(&hash));
        assert!(!text.contains(&reset.token));
    }

    #[test]
    fn test_private_tier_is_minimal_for_every_flag_set() {
        let mut user = populated_user();
        user.privacy = ProfilePrivacy::Private;
        let stranger = Viewer::User(UserId::new());

        for settings in all_flag_combinations() {
            user.visibility = settings;
            for viewer in [Viewer::Anonymous, stranger] {
                let value = json(&project(&user, viewer));
                let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
                keys.sort();
                assert_eq!(
                    keys,
                    vec![
                        "displayName",
                        "id",
                        "isPrivate",
                        "profileImage",
                        "profilePrivacy",
                        "username"
                    ]
                );
                assert_eq!(value["isPrivate"], true);
                assert_eq!(value["profilePrivacy"], "private");
            }
        }
    }

    #[test]
    fn test_friends_tier_for_non_owner() {
        let mut user = populated_user();
        user.privacy = ProfilePrivacy::Friends;
        let value = json(&project(&user, Viewer::Anonymous));
        assert_eq!(value["isFriendsOnly"], true);
        assert!(value.get("isPrivate").is_none());
        assert!(value.get("bio").is_none());
    }

    #[test]
    fn test_owner_passes_tier_gate_but_sees_public_lists_only() {
        let mut user = populated_user();
        user.privacy = ProfilePrivacy::Private;
        match project(&user, Viewer::User(user.user_id)) {
            ProfileView::Visible(view) => {
                assert_eq!(view.custom_lists.len(), 1);
                assert_eq!(view.custom_lists[0].name, "Public");
                assert!(view.email.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_hidden_bio_is_absent_not_empty() {
        let mut user = populated_user();
        user.stats.total_games_played = 4;
        user.visibility.show_bio = false;
        user.visibility.show_game_stats = true;

        let value = json(&project(&user, Viewer::Anonymous));
        assert!(value.get("bio").is_none());
        assert_eq!(value["totalGamesPlayed"], 4);
    }

    #[test]
    fn test_game_stats_removed_as_unit() {
        let mut user = populated_user();
        user.visibility.show_game_stats = false;
        let value = json(&project(&user, Viewer::Anonymous));
        for key in ["totalGamesPlayed", "totalHoursPlayed", "achievementsUnlocked"] {
            assert!(value.get(key).is_none(), "{key}");
        }
    }

    #[test]
    fn test_email_hidden_by_default() {
        let user = populated_user();
        let value = json(&project(&user, Viewer::Anonymous));
        assert!(value.get("email").is_none());
    }

    #[test]
    fn test_hidden_lists_become_empty() {
        let mut user = populated_user();
        user.visibility.show_custom_lists = false;
        let ProfileView::Visible(view) = project(&user, Viewer::Anonymous) else {
            panic!("expected visible profile");
        };
        assert!(view.custom_lists.is_empty());
        assert_eq!(view.stats.custom_lists_count, None);
    }

    #[test]
    fn test_stats_distinguish_hidden_from_empty() {
        let mut user = populated_user();
        user.visibility.show_favorite_games = false;

        let ProfileView::Visible(view) = project(&user, Viewer::Anonymous) else {
            panic!("expected visible profile");
        };
        assert_eq!(view.stats.favorite_games_count, None);
        assert_eq!(view.stats.played_games_count, Some(0));
        assert_eq!(view.stats.custom_lists_count, Some(1));

        let value = json(&view);
        assert!(value["stats"].get("favoriteGamesCount").is_none());
        assert_eq!(value["stats"]["playedGamesCount"], 0);
    }

    #[test]
    fn test_self_view_shows_everything() {
        let mut user = populated_user();
        user.privacy = ProfilePrivacy::Private;
        user.visibility = VisibilitySettings {
            show_email: false,
            show_bio: false,
            show_location: false,
            show_game_stats: false,
            show_favorite_games: false,
            show_played_games: false,
            show_custom_lists: false,
        };
        let view = self_view(&user);
        assert_eq!(view.profile.email.as_deref(), Some("ana@example.com"));
        assert_eq!(view.profile.bio.as_deref(), Some("hi"));
        assert_eq!(view.profile.custom_lists.len(), 2);
        assert_eq!(view.profile.stats.favorite_games_count, Some(1));

        let value = json(&view);
        assert_eq!(value["visibility"]["showBio"], false);
        assert_eq!(value["username"], "ana");
    }
}
