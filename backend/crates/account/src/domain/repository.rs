//! Repository Traits
//!
//! The account store is the only path to persisted users. Implementations
//! live in the infrastructure layer.

use kernel::id::UserId;

use crate::domain::entity::user::User;
use crate::domain::value_object::email::Email;
use crate::error::AccountResult;

/// Account store trait
///
/// The whole user aggregate (lists included) is read and written as one
/// unit. `save` is last-writer-wins per user.
#[trait_variant::make(AccountStore: Send)]
pub trait LocalAccountStore {
    /// Insert a new user. Fails with `EmailTaken` / `UserNameTaken` when a
    /// unique key is already in use.
    async fn create(&self, user: &User) -> AccountResult<()>;

    /// Find user by primary key
    async fn find_by_id(&self, user_id: &UserId) -> AccountResult<Option<User>>;

    /// Find user by (lowercased) email
    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<User>>;

    /// Find user by canonical user name
    async fn find_by_user_name(&self, canonical: &str) -> AccountResult<Option<User>>;

    /// Replace the stored aggregate. Fails with `NotFound` if the user was
    /// never created.
    async fn save(&self, user: &User) -> AccountResult<()>;

    /// Active users whose user name or display name contains `term`
    /// (case-insensitive), ordered by user name
    async fn search(&self, term: &str, limit: usize) -> AccountResult<Vec<User>>;
}
