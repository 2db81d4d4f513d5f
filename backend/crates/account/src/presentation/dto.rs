//! API DTOs (Data Transfer Objects)
//!
//! Requests are deserialized as-is and then turned into validated domain
//! input by [`ValidateRequest`]. Every field failure is collected, so a
//! single 400 names all offending fields.

use chrono::{DateTime, Utc};
use platform::password::ClearTextPassword;
use serde::{Deserialize, Serialize};

use crate::application::{AuthContext, IssuedCredential, LoginInput, RegisterInput, SignedIn};
use crate::domain::entity::custom_lists::{ListChanges, ListDraft, ListError};
use crate::domain::entity::library::PlayedGameUpdate;
use crate::domain::entity::user::{PrivacyChanges, ProfileChanges};
use crate::domain::value_object::{
    email::Email,
    game::{GameId, GameName, GameRef, Hours, PlayStatus, Rating},
    privacy::{ProfilePrivacy, VisibilityFlag},
    profile::{self, Bio, DisplayName, Location, WebUrl},
    user_name::UserName,
};
use crate::error::ValidationErrors;

/// Turn a raw request body into validated input
pub trait ValidateRequest {
    type Valid;

    fn validate(self) -> Result<Self::Valid, ValidationErrors>;
}

// ============================================================================
// Auth
// ============================================================================

/// Register request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub display_name: Option<String>,
}

impl ValidateRequest for RegisterRequest {
    type Valid = RegisterInput;

    fn validate(self) -> Result<RegisterInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let email = Email::new(self.email);
        let user_name = UserName::new(&self.username);
        let password = ClearTextPassword::new(self.password);
        let display_name = self.display_name.as_deref().map(DisplayName::new).transpose();

        if let Err(e) = &email {
            errors.push("email", e.message().to_string());
        }
        if let Err(e) = &user_name {
            errors.push("username", e.to_string());
        }
        if let Err(e) = &password {
            errors.push("password", e.to_string());
        }
        if let Err(e) = &display_name {
            errors.push("displayName", e.message().to_string());
        }

        match (email, user_name, password, display_name) {
            (Ok(email), Ok(user_name), Ok(password), Ok(display_name)) => Ok(RegisterInput {
                email,
                user_name,
                password,
                display_name,
            }),
            _ => Err(errors),
        }
    }
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email or user name
    pub identifier: String,
    pub password: String,
}

impl ValidateRequest for LoginRequest {
    type Valid = LoginInput;

    fn validate(self) -> Result<LoginInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.identifier.trim().is_empty() {
            errors.push("identifier", "Email or user name is required");
        }
        if self.password.is_empty() {
            errors.push("password", "Password is required");
        }
        errors.into_result()?;
        Ok(LoginInput {
            identifier: self.identifier,
            password: self.password,
        })
    }
}

/// Identity summary returned with a credential
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: String,
    pub email: String,
    pub username: String,
}

impl From<&AuthContext> for AccountSummary {
    fn from(ctx: &AuthContext) -> Self {
        Self {
            id: ctx.user_id.to_string(),
            email: ctx.email.clone(),
            username: ctx.user_name.clone(),
        }
    }
}

/// Credential response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
}

impl From<IssuedCredential> for TokenResponse {
    fn from(credential: IssuedCredential) -> Self {
        Self {
            token: credential.token,
            token_type: "Bearer",
            expires_at: credential.expires_at,
        }
    }
}

/// Register / login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(flatten)]
    pub credential: TokenResponse,
    pub user: AccountSummary,
}

impl From<SignedIn> for AuthResponse {
    fn from(signed_in: SignedIn) -> Self {
        Self {
            user: AccountSummary::from(&signed_in.context),
            credential: signed_in.credential.into(),
        }
    }
}

// ============================================================================
// Profile
// ============================================================================

/// Partial profile update. An empty `website` or `profileImage` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub profile_image: Option<String>,
    pub favorite_genres: Option<Vec<String>>,
    pub gaming_platforms: Option<Vec<String>>,
}

impl ValidateRequest for UpdateProfileRequest {
    type Valid = ProfileChanges;

    fn validate(self) -> Result<ProfileChanges, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut changes = ProfileChanges::default();

        macro_rules! field {
            ($value:expr, $name:literal, $parse:expr) => {
                match $value.map(|v| $parse(v)).transpose() {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        errors.push($name, e.message().to_string());
                        None
                    }
                }
            };
        }

        changes.display_name = field!(self.display_name.as_deref(), "displayName", DisplayName::new);
        changes.bio = field!(self.bio.as_deref(), "bio", Bio::new);
        changes.location = field!(self.location.as_deref(), "location", Location::new);
        changes.website = field!(self.website.as_deref(), "website", WebUrl::optional);
        changes.profile_image = field!(self.profile_image.as_deref(), "profileImage", WebUrl::optional);
        changes.favorite_genres = field!(self.favorite_genres.as_deref(), "favoriteGenres", profile::tags);
        changes.gaming_platforms =
            field!(self.gaming_platforms.as_deref(), "gamingPlatforms", profile::tags);

        errors.into_result()?;
        Ok(changes)
    }
}

/// Partial privacy update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePrivacyRequest {
    pub profile_privacy: Option<ProfilePrivacy>,
    pub show_email: Option<bool>,
    pub show_bio: Option<bool>,
    pub show_location: Option<bool>,
    pub show_game_stats: Option<bool>,
    pub show_favorite_games: Option<bool>,
    pub show_played_games: Option<bool>,
    pub show_custom_lists: Option<bool>,
}

impl ValidateRequest for UpdatePrivacyRequest {
    type Valid = PrivacyChanges;

    fn validate(self) -> Result<PrivacyChanges, ValidationErrors> {
        let flags = [
            (VisibilityFlag::ShowEmail, self.show_email),
            (VisibilityFlag::ShowBio, self.show_bio),
            (VisibilityFlag::ShowLocation, self.show_location),
            (VisibilityFlag::ShowGameStats, self.show_game_stats),
            (VisibilityFlag::ShowFavoriteGames, self.show_favorite_games),
            (VisibilityFlag::ShowPlayedGames, self.show_played_games),
            (VisibilityFlag::ShowCustomLists, self.show_custom_lists),
        ]
        .into_iter()
        .filter_map(|(flag, value)| value.map(|v| (flag, v)))
        .collect();

        Ok(PrivacyChanges {
            profile_privacy: self.profile_privacy,
            flags,
        })
    }
}

/// Search query string
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

// ============================================================================
// Games
// ============================================================================

/// Game reference as sent by clients
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRequest {
    pub game_id: u64,
    pub game_name: String,
    pub game_image: Option<String>,
}

impl ValidateRequest for GameRequest {
    type Valid = GameRef;

    fn validate(self) -> Result<GameRef, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let game_name = GameName::new(&self.game_name);
        let game_image = self
            .game_image
            .as_deref()
            .map(WebUrl::optional)
            .transpose()
            .map(Option::flatten);

        if let Err(e) = &game_name {
            errors.push("gameName", e.message().to_string());
        }
        if let Err(e) = &game_image {
            errors.push("gameImage", e.message().to_string());
        }

        match (game_name, game_image) {
            (Ok(game_name), Ok(game_image)) => Ok(GameRef {
                game_id: GameId::new(self.game_id),
                game_name,
                game_image,
            }),
            _ => Err(errors),
        }
    }
}

/// Played-game upsert
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayedGameRequest {
    #[serde(flatten)]
    pub game: GameRequest,
    pub status: Option<PlayStatus>,
    pub rating: Option<i64>,
    pub hours_played: Option<f64>,
}

impl ValidateRequest for PlayedGameRequest {
    type Valid = PlayedGameUpdate;

    fn validate(self) -> Result<PlayedGameUpdate, ValidationErrors> {
        let game = self.game.validate();
        let rating = self.rating.map(Rating::new).transpose();
        let hours = self.hours_played.map(Hours::new).transpose();

        let mut errors = match &game {
            Err(e) => e.clone(),
            Ok(_) => ValidationErrors::new(),
        };
        if let Err(e) = &rating {
            errors.push("rating", e.message().to_string());
        }
        if let Err(e) = &hours {
            errors.push("hoursPlayed", e.message().to_string());
        }

        match (game, rating, hours) {
            (Ok(game), Ok(rating), Ok(hours_played)) => Ok(PlayedGameUpdate {
                game_id: game.game_id,
                game_name: game.game_name,
                game_image: game.game_image,
                status: self.status,
                rating,
                hours_played,
            }),
            _ => Err(errors),
        }
    }
}

// ============================================================================
// Lists
// ============================================================================

fn list_errors(err: ListError) -> ValidationErrors {
    match err {
        ListError::InvalidName(msg) => ValidationErrors::single("name", msg),
        ListError::InvalidDescription(msg) => ValidationErrors::single("description", msg),
        other => ValidationErrors::single("list", other.to_string()),
    }
}

/// Create list request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListRequest {
    pub name: String,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

impl ValidateRequest for CreateListRequest {
    type Valid = ListDraft;

    fn validate(self) -> Result<ListDraft, ValidationErrors> {
        ListDraft::parse(&self.name, self.description.as_deref(), self.is_public).map_err(list_errors)
    }
}

/// Update list request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

impl ValidateRequest for UpdateListRequest {
    type Valid = ListChanges;

    fn validate(self) -> Result<ListChanges, ValidationErrors> {
        ListChanges::parse(
            self.name.as_deref(),
            self.description.as_deref(),
            self.is_public,
        )
        .map_err(list_errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(email: &str, username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            username: username.into(),
            password: password.into(),
            display_name: None,
        }
    }

    #[test]
    fn test_register_collects_every_bad_field() {
        let errors = register("not-an-email", "a", "x").validate().unwrap_err();
        assert!(errors.has_field("email"));
        assert!(errors.has_field("username"));
        assert!(errors.has_field("password"));
        assert!(!errors.has_field("displayName"));
    }

    #[test]
    fn test_register_valid() {
        let input = register("Ana@Example.com", "ana_b", "correct horse battery")
            .validate()
            .unwrap();
        assert_eq!(input.email.as_str(), "ana@example.com");
        assert_eq!(input.user_name.canonical(), "ana_b");
    }

    #[test]
    fn test_profile_update_names_fields() {
        let req = UpdateProfileRequest {
            bio: Some("x".repeat(501)),
            location: Some("Lisbon".into()),
            website: Some("ftp://nope".into()),
            ..Default::default()
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.has_field("bio"));
        assert!(errors.has_field("website"));
        assert!(!errors.has_field("location"));
    }

    #[test]
    fn test_profile_update_empty_website_clears() {
        let req = UpdateProfileRequest {
            website: Some(String::new()),
            ..Default::default()
        };
        let changes = req.validate().unwrap();
        assert_eq!(changes.website, Some(None));
        assert!(changes.bio.is_none());
    }

    #[test]
    fn test_privacy_request_keeps_only_sent_flags() {
        let req: UpdatePrivacyRequest =
            serde_json::from_str(r#"{"profilePrivacy":"friends","showBio":false}"#).unwrap();
        let changes = req.validate().unwrap();
        assert_eq!(changes.profile_privacy, Some(ProfilePrivacy::Friends));
        assert_eq!(changes.flags, vec![(VisibilityFlag::ShowBio, false)]);
    }

    #[test]
    fn test_played_game_ranges() {
        let req: PlayedGameRequest = serde_json::from_str(
            r#"{"gameId":7,"gameName":"Tetris","rating":11,"hoursPlayed":-1}"#,
        )
        .unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.has_field("rating"));
        assert!(errors.has_field("hoursPlayed"));

        let req: PlayedGameRequest = serde_json::from_str(
            r#"{"gameId":7,"gameName":"Tetris","hoursPlayed":1e308}"#,
        )
        .unwrap();
        assert!(req.validate().unwrap_err().has_field("hoursPlayed"));

        let req: PlayedGameRequest =
            serde_json::from_str(r#"{"gameId":7,"gameName":"Tetris","status":"plan-to-play"}"#)
                .unwrap();
        let update = req.validate().unwrap();
        assert_eq!(update.status, Some(PlayStatus::PlanToPlay));
    }

    #[test]
    fn test_list_requests() {
        let errors = CreateListRequest {
            name: "   ".into(),
            description: None,
            is_public: None,
        }
        .validate()
        .unwrap_err();
        assert!(errors.has_field("name"));

        let errors = UpdateListRequest {
            description: Some("d".repeat(201)),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert!(errors.has_field("description"));
    }

    #[test]
    fn test_auth_response_shape() {
        let ctx = AuthContext {
            user_id: kernel::id::UserId::new(),
            email: "ana@example.com".into(),
            user_name: "ana".into(),
        };
        let response = AuthResponse::from(SignedIn {
            credential: IssuedCredential {
                token: "t".into(),
                expires_at: Utc::now(),
            },
            context: ctx,
        });
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["tokenType"], "Bearer");
        assert_eq!(json["user"]["username"], "ana");
        assert!(json.get("expiresAt").is_some());
    }
}
