//! Privacy Value Objects
//!
//! A master tier plus independent per-field toggles.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Blanket visibility tier of a profile
///
/// Anything other than `Public` short-circuits the per-field flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfilePrivacy {
    #[default]
    #[display("public")]
    Public,
    #[display("friends")]
    Friends,
    #[display("private")]
    Private,
}

/// Independent per-field visibility toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisibilitySettings {
    pub show_email: bool,
    pub show_bio: bool,
    pub show_location: bool,
    pub show_game_stats: bool,
    pub show_favorite_games: bool,
    pub show_played_games: bool,
    pub show_custom_lists: bool,
}

impl Default for VisibilitySettings {
    fn default() -> Self {
        Self {
            show_email: false,
            show_bio: true,
            show_location: true,
            show_game_stats: true,
            show_favorite_games: true,
            show_played_games: true,
            show_custom_lists: true,
        }
    }
}

impl VisibilitySettings {
    /// Read a single toggle
    #[inline]
    pub const fn get(&self, flag: VisibilityFlag) -> bool {
        match flag {
            VisibilityFlag::ShowEmail => self.show_email,
            VisibilityFlag::ShowBio => self.show_bio,
            VisibilityFlag::ShowLocation => self.show_location,
            VisibilityFlag::ShowGameStats => self.show_game_stats,
            VisibilityFlag::ShowFavoriteGames => self.show_favorite_games,
            VisibilityFlag::ShowPlayedGames => self.show_played_games,
            VisibilityFlag::ShowCustomLists => self.show_custom_lists,
        }
    }

    /// Write a single toggle
    pub fn set(&mut self, flag: VisibilityFlag, value: bool) {
        let slot = match flag {
            VisibilityFlag::ShowEmail => &mut self.show_email,
            VisibilityFlag::ShowBio => &mut self.show_bio,
            VisibilityFlag::ShowLocation => &mut self.show_location,
            VisibilityFlag::ShowGameStats => &mut self.show_game_stats,
            VisibilityFlag::ShowFavoriteGames => &mut self.show_favorite_games,
            VisibilityFlag::ShowPlayedGames => &mut self.show_played_games,
            VisibilityFlag::ShowCustomLists => &mut self.show_custom_lists,
        };
        *slot = value;
    }
}

/// Names of the per-field toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum VisibilityFlag {
    #[display("showEmail")]
    ShowEmail,
    #[display("showBio")]
    ShowBio,
    #[display("showLocation")]
    ShowLocation,
    #[display("showGameStats")]
    ShowGameStats,
    #[display("showFavoriteGames")]
    ShowFavoriteGames,
    #[display("showPlayedGames")]
    ShowPlayedGames,
    #[display("showCustomLists")]
    ShowCustomLists,
}

impl VisibilityFlag {
    pub const ALL: [VisibilityFlag; 7] = [
        VisibilityFlag::ShowEmail,
        VisibilityFlag::ShowBio,
        VisibilityFlag::ShowLocation,
        VisibilityFlag::ShowGameStats,
        VisibilityFlag::ShowFavoriteGames,
        VisibilityFlag::ShowPlayedGames,
        VisibilityFlag::ShowCustomLists,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = VisibilitySettings::default();
        assert!(!settings.show_email);
        assert!(
            VisibilityFlag::ALL
                .iter()
                .filter(|f| **f != VisibilityFlag::ShowEmail)
                .all(|f| settings.get(*f))
        );
        assert_eq!(ProfilePrivacy::default(), ProfilePrivacy::Public);
    }

    #[test]
    fn test_get_set_roundtrip_each_flag() {
        for flag in VisibilityFlag::ALL {
            let mut settings = VisibilitySettings::default();
            settings.set(flag, false);
            assert!(!settings.get(flag), "{flag}");
            settings.set(flag, true);
            assert!(settings.get(flag), "{flag}");
        }
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&ProfilePrivacy::Friends).unwrap(),
            "\"friends\""
        );
        let partial: VisibilitySettings =
            serde_json::from_str(r#"{"showBio":false}"#).unwrap();
        assert!(!partial.show_bio);
        assert!(partial.show_location);
    }
}
