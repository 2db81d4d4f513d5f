//! Account (Session & Profile Visibility) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - User aggregate, value objects, profile projection, store trait
//! - `application/` - Session authority, use cases and services
//! - `infra/` - PostgreSQL and in-memory account stores
//! - `presentation/` - HTTP handlers, DTOs, request gate, router
//!
//! ## Features
//! - Registration and login by email or user name
//! - Stateless bearer credentials (HMAC-SHA256) with grace refresh
//! - Profile privacy tiers and per-field visibility toggles
//! - Favorite / played game tracking and named custom game lists
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional pepper
//! - Every credential failure renders as the same 401 body
//! - Projected views have no field that could carry a secret

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AccountConfig;
pub use error::{AccountError, AccountResult};
pub use infra::{memory::MemoryAccountStore, postgres::PgAccountStore};
pub use presentation::router::{account_router, account_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
