//! Account Router
//!
//! Paths are relative; the binary nests this router under `/api`.

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post, put},
};
use std::sync::Arc;

use crate::application::config::AccountConfig;
use crate::domain::repository::AccountStore;
use crate::infra::postgres::PgAccountStore;
use crate::presentation::handlers::{self, AccountAppState};
use crate::presentation::middleware::{identify_viewer, require_auth};

/// Create the Account router with the PostgreSQL store
pub fn account_router(store: PgAccountStore, config: AccountConfig) -> Router {
    account_router_generic(store, config)
}

/// Create a generic Account router for any store implementation
pub fn account_router_generic<S>(store: S, config: AccountConfig) -> Router
where
    S: AccountStore + Clone + Send + Sync + 'static,
{
    let state = AccountAppState {
        store: Arc::new(store),
        config: Arc::new(config),
    };

    let public = Router::new()
        .route("/auth/register", post(handlers::register::<S>))
        .route("/auth/login", post(handlers::login::<S>))
        .route("/auth/refresh", post(handlers::refresh::<S>));

    let profiles = Router::new()
        .route("/profiles", get(handlers::search_profiles::<S>))
        .route("/profiles/{id_or_username}", get(handlers::public_profile::<S>))
        .route_layer(from_fn_with_state(state.clone(), identify_viewer::<S>));

    let private = Router::new()
        .route("/auth/me", get(handlers::me))
        .route(
            "/users/me",
            get(handlers::own_profile::<S>).delete(handlers::deactivate::<S>),
        )
        .route("/users/me/profile", patch(handlers::update_profile::<S>))
        .route("/users/me/privacy", patch(handlers::update_privacy::<S>))
        .route("/users/me/favorites", post(handlers::add_favorite::<S>))
        .route(
            "/users/me/favorites/{game_id}",
            delete(handlers::remove_favorite::<S>),
        )
        .route("/users/me/played", put(handlers::upsert_played_game::<S>))
        .route(
            "/users/me/played/{game_id}",
            delete(handlers::remove_played_game::<S>),
        )
        .route(
            "/lists",
            get(handlers::list_lists::<S>).post(handlers::create_list::<S>),
        )
        .route(
            "/lists/{list_id}",
            get(handlers::get_list::<S>)
                .patch(handlers::update_list::<S>)
                .delete(handlers::delete_list::<S>),
        )
        .route("/lists/{list_id}/games", post(handlers::add_list_game::<S>))
        .route(
            "/lists/{list_id}/games/{game_id}",
            delete(handlers::remove_list_game::<S>),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth::<S>));

    Router::new()
        .merge(public)
        .merge(profiles)
        .merge(private)
        .with_state(state)
}
