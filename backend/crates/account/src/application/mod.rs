//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod credential;
pub mod game_library;
pub mod list_manager;
pub mod login;
pub mod profile_service;
pub mod register;
pub mod session_authority;

use kernel::id::UserId;

use crate::domain::entity::user::User;
use crate::domain::repository::AccountStore;
use crate::error::{AccountError, AccountResult};

// Re-exports
pub use config::AccountConfig;
pub use credential::{CredentialCodec, CredentialError, IssuedCredential};
pub use game_library::{GameLibrary, LibraryView};
pub use list_manager::ListManager;
pub use login::{LoginInput, LoginUseCase};
pub use profile_service::ProfileService;
pub use register::{RegisterInput, RegisterUseCase, SignedIn};
pub use session_authority::{AuthContext, SessionAuthority};

/// Load the acting user for a mutation. A subject that vanished or was
/// deactivated after authentication is reported as unavailable.
pub(crate) async fn load_active_user<S>(store: &S, user_id: &UserId) -> AccountResult<User>
where
    S: AccountStore,
{
    match store.find_by_id(user_id).await? {
        Some(user) if user.is_active => Ok(user),
        _ => Err(AccountError::AccountUnavailable),
    }
}
