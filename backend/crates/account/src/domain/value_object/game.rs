//! Game Value Objects
//!
//! Games live in an external catalogue; the account only keeps the
//! catalogue id plus a cached name and image for display.

use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::value_object::profile::WebUrl;

pub const GAME_NAME_MAX_LENGTH: usize = 200;
pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 10;
/// Upper bound on the hours of a single played-game entry
pub const HOURS_MAX: f64 = 100_000.0;
/// Upper bound on a user's cumulative hours
pub const TOTAL_HOURS_MAX: f64 = 1_000_000_000.0;

/// External catalogue id of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(u64);

impl GameId {
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl FromStr for GameId {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| AppError::bad_request("Game id must be a non-negative integer"))
    }
}

/// Cached display name of a game
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{_0}")]
pub struct GameName(String);

impl GameName {
    pub fn new(value: &str) -> AppResult<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(AppError::bad_request("Game name is required"));
        }
        if value.chars().count() > GAME_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Game name must be at most {GAME_NAME_MAX_LENGTH} characters"
            )));
        }
        Ok(Self(value.to_string()))
    }

    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Catalogue reference shared by favorites, played games and list entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRef {
    pub game_id: GameId,
    pub game_name: GameName,
    pub game_image: Option<WebUrl>,
}

/// Where a user stands with a played game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayStatus {
    #[default]
    #[display("playing")]
    Playing,
    #[display("completed")]
    Completed,
    #[display("dropped")]
    Dropped,
    #[display("plan-to-play")]
    PlanToPlay,
}

impl PlayStatus {
    pub const ALL: [PlayStatus; 4] = [
        PlayStatus::Playing,
        PlayStatus::Completed,
        PlayStatus::Dropped,
        PlayStatus::PlanToPlay,
    ];
}

impl FromStr for PlayStatus {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.to_string() == s)
            .ok_or_else(|| {
                AppError::bad_request(
                    "Status must be one of: playing, completed, dropped, plan-to-play",
                )
            })
    }
}

/// User rating between 1 and 10 inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: i64) -> AppResult<Self> {
        if !(i64::from(RATING_MIN)..=i64::from(RATING_MAX)).contains(&value) {
            return Err(AppError::bad_request(format!(
                "Rating must be between {RATING_MIN} and {RATING_MAX}"
            )));
        }
        Ok(Self(value as u8))
    }

    pub const fn value(&self) -> u8 {
        self.0
    }
}

/// Non-negative, finite number of hours
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Display, Serialize)]
#[serde(transparent)]
pub struct Hours(f64);

impl Hours {
    pub const ZERO: Hours = Hours(0.0);

    pub fn new(value: f64) -> AppResult<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(AppError::bad_request(
                "Hours played must be a non-negative number",
            ));
        }
        if value > HOURS_MAX {
            return Err(AppError::bad_request(format!(
                "Hours played must be at most {HOURS_MAX}"
            )));
        }
        Ok(Self(value))
    }

    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Add to a running total, `None` past [`TOTAL_HOURS_MAX`]
    pub fn checked_add(self, rhs: Hours) -> Option<Hours> {
        let sum = self.0 + rhs.0;
        (sum.is_finite() && sum <= TOTAL_HOURS_MAX).then_some(Hours(sum))
    }

    /// Stored totals never go below zero or above [`TOTAL_HOURS_MAX`]
    pub fn from_db(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            Self(value.min(TOTAL_HOURS_MAX))
        } else {
            Self::ZERO
        }
    }
}
