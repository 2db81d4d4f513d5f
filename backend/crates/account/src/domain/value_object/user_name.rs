//! User Name Value Object
//!
//! ユーザー名はプロフィール URL やログインに使われる**公開ハンドル**。
//!
//! ## 設計方針
//! - ASCII 英数字と `_` のみ許可
//! - 大文字入力は受け付け、表示用に保持するが、canonical（正規形）は小文字
//! - NFKC 正規化 → trim → 検証 の順で処理
//!
//! ## 不変条件
//! - 長さ: 3〜20 文字（正規化後）
//! - 予約語でないこと

use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 20;

/// Names that collide with routes or would impersonate the service
const RESERVED_WORDS: &[&str] = &[
    "admin",
    "administrator",
    "root",
    "system",
    "support",
    "api",
    "auth",
    "login",
    "logout",
    "register",
    "me",
    "self",
    "users",
    "profiles",
    "lists",
    "settings",
    "null",
    "undefined",
    "anonymous",
    "official",
];

/// Error returned when user name validation fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserNameError {
    /// User name is too short (minimum: USER_NAME_MIN_LENGTH)
    TooShort { length: usize },

    /// User name is too long (maximum: USER_NAME_MAX_LENGTH)
    TooLong { length: usize },

    /// User name contains a character outside `[A-Za-z0-9_]`
    InvalidCharacter { char: char, position: usize },

    /// User name is a reserved word
    Reserved { word: String },
}

impl fmt::Display for UserNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { length } => write!(
                f,
                "User name is too short ({length} chars, minimum {USER_NAME_MIN_LENGTH})"
            ),
            Self::TooLong { length } => write!(
                f,
                "User name is too long ({length} chars, maximum {USER_NAME_MAX_LENGTH})"
            ),
            Self::InvalidCharacter { char, position } => write!(
                f,
                "Invalid character '{char}' at position {position}. Only letters, digits and _ are allowed"
            ),
            Self::Reserved { word } => write!(f, "'{word}' is a reserved user name"),
        }
    }
}

impl std::error::Error for UserNameError {}

/// Validated user name
///
/// # Storage
/// - `original`: user input after NFKC and trim, case preserved
/// - `canonical`: lowercase form for uniqueness checks and lookups
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct UserName {
    original: String,
    canonical: String,
}

impl UserName {
    /// Create a new UserName from raw input
    pub fn new(input: impl AsRef<str>) -> Result<Self, UserNameError> {
        let original = Self::normalize(input.as_ref());
        let canonical = original.to_ascii_lowercase();
        Self::validate(&original, &canonical)?;
        Ok(Self {
            original,
            canonical,
        })
    }

    /// Create from a stored value (assumed already validated)
    pub fn from_db(original: &str) -> Self {
        Self {
            original: original.to_string(),
            canonical: original.to_ascii_lowercase(),
        }
    }

    /// Canonical form of arbitrary input, for lookups that must not fail
    pub fn canonicalize(input: &str) -> String {
        Self::normalize(input).to_ascii_lowercase()
    }

    /// Get the original user name (preserves case)
    #[inline]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Get the canonical (lowercase) user name
    #[inline]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    fn normalize(input: &str) -> String {
        input.nfkc().collect::<String>().trim().to_string()
    }

    fn validate(original: &str, canonical: &str) -> Result<(), UserNameError> {
        let length = original.chars().count();
        if length < USER_NAME_MIN_LENGTH {
            return Err(UserNameError::TooShort { length });
        }
        if length > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong { length });
        }

        if let Some((position, char)) = original
            .chars()
            .enumerate()
            .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        {
            return Err(UserNameError::InvalidCharacter { char, position });
        }

        if RESERVED_WORDS.contains(&canonical) {
            return Err(UserNameError::Reserved {
                word: canonical.to_string(),
            });
        }

        Ok(())
    }
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserName")
            .field("original", &self.original)
            .field("canonical", &self.canonical)
            .finish()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}
