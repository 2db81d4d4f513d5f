//! Account Error Types
//!
//! Account-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.
//!
//! Credential and account-status failures are distinguished internally
//! so callers can decide between "reject" and "offer refresh", but they
//! all render as the same 401 body.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{
    app_error::{AppError, FieldError},
    kind::ErrorKind,
};
use thiserror::Error;

use crate::application::credential::CredentialError;
use crate::domain::entity::custom_lists::ListError;

/// Account-specific result type alias
pub type AccountResult<T> = Result<T, AccountError>;

/// Field-level validation failures, always naming the offending field(s)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self(vec![FieldError::new(field, message)])
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    /// Record the error of a failed check under `field`, discarding the value
    pub fn check<T>(&mut self, field: &'static str, result: Result<T, AppError>) {
        if let Err(e) = result {
            self.push(field, e.message().to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|f| f.field == field)
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), Self> {
        if self.0.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join("; "))
    }
}

/// Account-specific error variants
#[derive(Debug, Error)]
pub enum AccountError {
    /// No or malformed `Authorization` header on a gated route
    #[error("Authentication required")]
    AuthenticationMissing,

    /// Credential signature or structure did not verify
    #[error("Invalid credential")]
    InvalidCredential,

    /// Credential is well-formed but past its expiry
    #[error("Credential expired")]
    CredentialExpired,

    /// Subject resolved but inactive or no longer present
    #[error("Account unavailable")]
    AccountUnavailable,

    /// Wrong identifier or password at login
    #[error("Invalid email, user name or password")]
    InvalidLogin,

    /// Input violates a field constraint
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Referenced user or list does not exist in the caller's scope
    #[error("{0} not found")]
    NotFound(&'static str),

    /// List name collides case-insensitively with another list of the owner
    #[error("A list with this name already exists")]
    DuplicateName,

    #[error("Email is already registered")]
    EmailTaken,

    #[error("User name is already taken")]
    UserNameTaken,

    /// Reserved for optimistic concurrency at the store boundary
    #[error("The record was modified concurrently")]
    Conflict,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccountError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AccountError::Validation(ValidationErrors::single(field, message))
    }

    /// Whether this is one of the failures rendered as a bare 401
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AccountError::AuthenticationMissing
                | AccountError::InvalidCredential
                | AccountError::CredentialExpired
                | AccountError::AccountUnavailable
                | AccountError::InvalidLogin
        )
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::AuthenticationMissing
            | AccountError::InvalidCredential
            | AccountError::CredentialExpired
            | AccountError::AccountUnavailable
            | AccountError::InvalidLogin => ErrorKind::Unauthorized,
            AccountError::Validation(_) => ErrorKind::BadRequest,
            AccountError::NotFound(_) => ErrorKind::NotFound,
            AccountError::DuplicateName
            | AccountError::EmailTaken
            | AccountError::UserNameTaken
            | AccountError::Conflict => ErrorKind::Conflict,
            AccountError::Database(_) | AccountError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Convert to the caller-facing AppError.
    ///
    /// Auth failures collapse into one message and server errors never
    /// carry their cause.
    pub fn to_app_error(&self) -> AppError {
        match self {
            e if e.is_auth_failure() => {
                if matches!(e, AccountError::InvalidLogin) {
                    AppError::unauthorized(e.to_string())
                } else {
                    AppError::unauthorized("Not authorized")
                }
            }
            AccountError::Validation(errors) => AppError::validation(errors.fields().to_vec()),
            AccountError::Database(_) | AccountError::Internal(_) => {
                AppError::internal("Internal server error")
            }
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AccountError::Database(e) => {
                tracing::error!(error = %e, "Account database error");
            }
            AccountError::Internal(msg) => {
                tracing::error!(message = %msg, "Account internal error");
            }
            AccountError::InvalidCredential => {
                tracing::warn!("Rejected credential with invalid signature or structure");
            }
            AccountError::InvalidLogin => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Account error");
            }
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<CredentialError> for AccountError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Invalid => AccountError::InvalidCredential,
            CredentialError::Expired => AccountError::CredentialExpired,
        }
    }
}

impl From<ListError> for AccountError {
    fn from(err: ListError) -> Self {
        match err {
            ListError::NotFound => AccountError::NotFound("List"),
            ListError::DuplicateName => AccountError::DuplicateName,
            ListError::InvalidName(msg) => AccountError::validation("name", msg),
            ListError::InvalidDescription(msg) => AccountError::validation("description", msg),
        }
    }
}

impl From<ValidationErrors> for AccountError {
    fn from(errors: ValidationErrors) -> Self {
        AccountError::Validation(errors)
    }
}
