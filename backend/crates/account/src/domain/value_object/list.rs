//! Custom List Value Objects

use kernel::error::app_error::{AppError, AppResult};
use std::fmt;

pub const LIST_NAME_MAX_LENGTH: usize = 50;
pub const LIST_DESCRIPTION_MAX_LENGTH: usize = 200;

/// Trimmed list name, 1–50 characters
///
/// Equality between names of one owner is case-insensitive; see [`ListName::same_as`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListName(String);

impl ListName {
    pub fn new(value: &str) -> AppResult<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(AppError::bad_request("List name cannot be empty"));
        }
        if value.chars().count() > LIST_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "List name must be at most {LIST_NAME_MAX_LENGTH} characters"
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

    /// Case-insensitive comparison used for per-owner uniqueness
    pub fn same_as(&self, other: &ListName) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }
}

impl fmt::Display for ListName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Optional list description, at most 200 characters
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListDescription(String);

impl ListDescription {
    pub fn new(value: &str) -> AppResult<Self> {
        let value = value.trim();
        if value.chars().count() > LIST_DESCRIPTION_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Description must be at most {LIST_DESCRIPTION_MAX_LENGTH} characters"
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
