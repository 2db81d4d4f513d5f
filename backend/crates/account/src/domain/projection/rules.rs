//! Visibility Rules
//!
//! Which profile fields each per-field toggle governs. The projection
//! consumes this table in one loop; nothing else decides per-field
//! visibility.

use crate::domain::value_object::privacy::{VisibilityFlag, VisibilitySettings};

/// A field (or collection) of the visible profile that a toggle can hide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Email,
    Bio,
    Location,
    TotalGamesPlayed,
    TotalHoursPlayed,
    AchievementsUnlocked,
    FavoriteGames,
    PlayedGames,
    CustomLists,
}

/// One row of the rule table: when `flag` is off, all of `fields` go
#[derive(Debug, Clone, Copy)]
pub struct VisibilityRule {
    pub flag: VisibilityFlag,
    pub fields: &'static [ProfileField],
}

/// Ordered rule table
pub const VISIBILITY_RULES: &[VisibilityRule] = &[
    VisibilityRule {
        flag: VisibilityFlag::ShowEmail,
        fields: &[ProfileField::Email],
    },
    VisibilityRule {
        flag: VisibilityFlag::ShowBio,
        fields: &[ProfileField::Bio],
    },
    VisibilityRule {
        flag: VisibilityFlag::ShowLocation,
        fields: &[ProfileField::Location],
    },
    VisibilityRule {
        flag: VisibilityFlag::ShowGameStats,
        fields: &[
            ProfileField::TotalGamesPlayed,
            ProfileField::TotalHoursPlayed,
            ProfileField::AchievementsUnlocked,
        ],
    },
    VisibilityRule {
        flag: VisibilityFlag::ShowFavoriteGames,
        fields: &[ProfileField::FavoriteGames],
    },
    VisibilityRule {
        flag: VisibilityFlag::ShowPlayedGames,
        fields: &[ProfileField::PlayedGames],
    },
    VisibilityRule {
        flag: VisibilityFlag::ShowCustomLists,
        fields: &[ProfileField::CustomLists],
    },
];

/// Fields hidden under `settings`, in table order
pub fn hidden_fields(settings: &VisibilitySettings) -> impl Iterator<Item = ProfileField> + '_ {
    VISIBILITY_RULES
        .iter()
        .filter(|rule| !settings.get(rule.flag))
        .flat_map(|rule| rule.fields.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_flag_has_exactly_one_rule() {
        for flag in VisibilityFlag::ALL {
            let count = VISIBILITY_RULES.iter().filter(|r| r.flag == flag).count();
            assert_eq!(count, 1, "{flag}");
        }
    }

    #[test]
    fn test_no_field_governed_twice() {
        let mut seen = std::collections::HashSet::new();
        for rule in VISIBILITY_RULES {
            for field in rule.fields {
                assert!(seen.insert(*field), "{field:?} appears twice");
            }
        }
    }

    #[test]
    fn test_game_stats_hidden_as_unit() {
        let settings = VisibilitySettings {
            show_email: true,
            show_game_stats: false,
            ..Default::default()
        };
        let hidden: Vec<_> = hidden_fields(&settings).collect();
        assert_eq!(
            hidden,
            vec![
                ProfileField::TotalGamesPlayed,
                ProfileField::TotalHoursPlayed,
                ProfileField::AchievementsUnlocked,
            ]
        );
    }
}
