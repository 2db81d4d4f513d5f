//! Profile Field Value Objects
//!
//! Free-text profile fields with their length limits, plus URL-valued
//! fields. Lengths are counted in characters after trimming.

use kernel::error::app_error::{AppError, AppResult};
use std::fmt;

pub const DISPLAY_NAME_MAX_LENGTH: usize = 50;
pub const BIO_MAX_LENGTH: usize = 500;
pub const LOCATION_MAX_LENGTH: usize = 100;
pub const URL_MAX_LENGTH: usize = 2048;
pub const TAG_MAX_LENGTH: usize = 50;
pub const TAGS_MAX_COUNT: usize = 20;

fn bounded(input: &str, what: &str, max: usize, allow_empty: bool) -> AppResult<String> {
    let value = input.trim();
    if !allow_empty && value.is_empty() {
        return Err(AppError::bad_request(format!("{what} cannot be empty")));
    }
    if value.chars().count() > max {
        return Err(AppError::bad_request(format!(
            "{what} must be at most {max} characters"
        )));
    }
    Ok(value.to_string())
}

/// `http` or `https` URL with a non-empty host
fn is_http_url(value: &str) -> bool {
    let rest = match value.split_once("://") {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("http") => rest,
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("https") => rest,
        _ => return false,
    };

    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host = authority.rsplit('@').next().unwrap_or_default();
    let host = match host.rsplit_once(':') {
        Some((h, port)) if port.chars().all(|c| c.is_ascii_digit()) => h,
        _ => host,
    };

    !host.is_empty()
        && !host.starts_with(['.', '-'])
        && !host.ends_with(['.', '-'])
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

macro_rules! text_value_object {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Default)]
        pub struct $name(String);

        impl $name {
            /// Create from a stored value (assumed already validated)
            pub fn from_db(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

text_value_object! {
    /// Name shown in place of the handle; 1–50 characters
    DisplayName
}

text_value_object! {
    /// Free-form bio; may be empty, at most 500 characters
    Bio
}

text_value_object! {
    /// Free-form location; may be empty, at most 100 characters
    Location
}

text_value_object! {
    /// Absolute http(s) URL
    WebUrl
}

impl DisplayName {
    pub fn new(value: &str) -> AppResult<Self> {
        bounded(value, "Display name", DISPLAY_NAME_MAX_LENGTH, false).map(Self)
    }
}

impl Bio {
    pub fn new(value: &str) -> AppResult<Self> {
        bounded(value, "Bio", BIO_MAX_LENGTH, true).map(Self)
    }
}

impl Location {
    pub fn new(value: &str) -> AppResult<Self> {
        bounded(value, "Location", LOCATION_MAX_LENGTH, true).map(Self)
    }
}

impl WebUrl {
    pub fn new(value: &str) -> AppResult<Self> {
        let value = bounded(value, "URL", URL_MAX_LENGTH, false)?;
        if !is_http_url(&value) {
            return Err(AppError::bad_request("Must be a valid http(s) URL"));
        }
        Ok(Self(value))
    }

    /// Empty input clears the field
    pub fn optional(value: &str) -> AppResult<Option<Self>> {
        if value.trim().is_empty() {
            Ok(None)
        } else {
            Self::new(value).map(Some)
        }
    }
}

/// Validate an ordered tag list (favorite genres, gaming platforms).
///
/// Entries are trimmed; blank entries and exact duplicates are dropped
/// while keeping first-seen order.
pub fn tags(values: &[String]) -> AppResult<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let tag = bounded(value, "Each entry", TAG_MAX_LENGTH, true)?;
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    if out.len() > TAGS_MAX_COUNT {
        return Err(AppError::bad_request(format!(
            "At most {TAGS_MAX_COUNT} entries are allowed"
        )));
    }
    Ok(out)
}
