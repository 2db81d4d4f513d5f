//! HTTP Handlers

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use std::str::FromStr;
use std::sync::Arc;

use kernel::id::ListId;

use crate::application::config::AccountConfig;
use crate::application::{
    AuthContext, GameLibrary, LibraryView, ListManager, LoginUseCase, ProfileService,
    RegisterUseCase, SessionAuthority,
};
use crate::domain::projection::{ListView, ProfileView, SelfView, Viewer};
use crate::domain::repository::AccountStore;
use crate::domain::value_object::game::GameId;
use crate::error::{AccountError, AccountResult};
use crate::presentation::dto::{
    AccountSummary, AuthResponse, CreateListRequest, GameRequest, LoginRequest,
    PlayedGameRequest, RegisterRequest, SearchQuery, TokenResponse, UpdateListRequest,
    UpdatePrivacyRequest, UpdateProfileRequest,
};
use crate::presentation::extract::ValidJson;
use crate::presentation::middleware::bearer_token;

/// Shared state for account handlers
#[derive(Clone)]
pub struct AccountAppState<S>
where
    S: AccountStore + Clone + Send + Sync + 'static,
{
    pub store: Arc<S>,
    pub config: Arc<AccountConfig>,
}

fn parse_list_id(raw: &str) -> AccountResult<ListId> {
    ListId::from_str(raw).map_err(|_| AccountError::NotFound("List"))
}

fn parse_game_id(raw: &str) -> AccountResult<GameId> {
    GameId::from_str(raw).map_err(|e| AccountError::validation("gameId", e.message().to_string()))
}

// ============================================================================
// Auth
// ============================================================================

/// POST /api/auth/register
pub async fn register<S>(
    State(state): State<AccountAppState<S>>,
    ValidJson(input): ValidJson<RegisterRequest>,
) -> AccountResult<impl IntoResponse>
where
    S: AccountStore + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.store.clone(), state.config.clone());
    let signed_in = use_case.execute(input).await?;

    Ok((StatusCode::CREATED, Json(AuthResponse::from(signed_in))))
}

/// POST /api/auth/login
pub async fn login<S>(
    State(state): State<AccountAppState<S>>,
    ValidJson(input): ValidJson<LoginRequest>,
) -> AccountResult<Json<AuthResponse>>
where
    S: AccountStore + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.store.clone(), state.config.clone());
    let signed_in = use_case.execute(input).await?;

    Ok(Json(signed_in.into()))
}

/// POST /api/auth/refresh
///
/// Not behind the gate: the presented credential may already be expired.
pub async fn refresh<S>(
    State(state): State<AccountAppState<S>>,
    headers: HeaderMap,
) -> AccountResult<Json<TokenResponse>>
where
    S: AccountStore + Clone + Send + Sync + 'static,
{
    let token = bearer_token(&headers).ok_or(AccountError::AuthenticationMissing)?;

    let authority = SessionAuthority::new(state.store.clone(), state.config.clone());
    let issued = authority.refresh(token).await?;

    Ok(Json(issued.into()))
}

/// GET /api/auth/me
pub async fn me(Extension(ctx): Extension<AuthContext>) -> Json<AccountSummary> {
    Json(AccountSummary::from(&ctx))
}

// ============================================================================
// Own account
// ============================================================================

/// GET /api/users/me
pub async fn own_profile<S>(
    State(state): State<AccountAppState<S>>,
    Extension(ctx): Extension<AuthContext>,
) -> AccountResult<Json<SelfView>>
where
    S: AccountStore + Clone + Send + Sync + 'static,
{
    let service = ProfileService::new(state.store.clone(), state.config.clone());
    Ok(Json(service.self_view(&ctx.user_id).await?))
}

/// PATCH /api/users/me/profile
pub async fn update_profile<S>(
    State(state): State<AccountAppState<S>>,
    Extension(ctx): Extension<AuthContext>,
    ValidJson(changes): ValidJson<UpdateProfileRequest>,
) -> AccountResult<Json<SelfView>>
where
    S: AccountStore + Clone + Send + Sync + 'static,
{
    let service = ProfileService::new(state.store.clone(), state.config.clone());
    Ok(Json(service.update_profile(&ctx.user_id, changes).await?))
}

/// PATCH /api/users/me/privacy
pub async fn update_privacy<S>(
    State(state): State<AccountAppState<S>>,
    Extension(ctx): Extension<AuthContext>,
    ValidJson(changes): ValidJson<UpdatePrivacyRequest>,
) -> AccountResult<Json<SelfView>>
where
    S: AccountStore + Clone + Send + Sync + 'static,
{
    let service = ProfileService::new(state.store.clone(), state.config.clone());
    Ok(Json(service.update_privacy(&ctx.user_id, changes).await?))
}

/// DELETE /api/users/me
pub async fn deactivate<S>(
    State(state): State<AccountAppState<S>>,
    Extension(ctx): Extension<AuthContext>,
) -> AccountResult<StatusCode>
where
    S: AccountStore + Clone + Send + Sync + 'static,
{
    let service = ProfileService::new(state.store.clone(), state.config.clone());
    service.deactivate(&ctx.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Favorites / played games
// ============================================================================

/// POST /api/users/me/favorites
pub async fn add_favorite<S>(
    State(state): State<AccountAppState<S>>,
    Extension(ctx): Extension<AuthContext>,
    ValidJson(game): ValidJson<GameRequest>,
) -> AccountResult<Json<LibraryView>>
where
    S: AccountStore + Clone + Send + Sync + 'static,
{
    let library = GameLibrary::new(state.store.clone());
    Ok(Json(library.add_favorite(&ctx.user_id, game).await?))
}

/// DELETE /api/users/me/favorites/{game_id}
pub async fn remove_favorite<S>(
    State(state): State<AccountAppState<S>>,
    Extension(ctx): Extension<AuthContext>,
    Path(game_id): Path<String>,
) -> AccountResult<Json<LibraryView>>
where
    S: AccountStore + Clone + Send + Sync + 'static,
{
    let game_id = parse_game_id(&game_id)?;
    let library = GameLibrary::new(state.store.clone());
    Ok(Json(library.remove_favorite(&ctx.user_id, game_id).await?))
}

/// PUT /api/users/me/played
pub async fn upsert_played_game<S>(
    State(state): State<AccountAppState<S>>,
    Extension(ctx): Extension<AuthContext>,
    ValidJson(update): ValidJson<PlayedGameRequest>,
) -> AccountResult<Json<LibraryView>>
where
    S: AccountStore + Clone + Send + Sync + 'static,
{
    let library = GameLibrary::new(state.store.clone());
    Ok(Json(library.upsert_played_game(&ctx.user_id, update).await?))
}

/// DELETE /api/users/me/played/{game_id}
pub async fn remove_played_game<S>(
    State(state): State<AccountAppState<S>>,
    Extension(ctx): Extension<AuthContext>,
    Path(game_id): Path<String>,
) -> AccountResult<Json<LibraryView>>
where
    S: AccountStore + Clone + Send + Sync + 'static,
{
    let game_id = parse_game_id(&game_id)?;
    let library = GameLibrary::new(state.store.clone());
    Ok(Json(library.remove_played_game(&ctx.user_id, game_id).await?))
}

// ============================================================================
// Lists
// ============================================================================

/// GET /api/lists
pub async fn list_lists<S>(
    State(state): State<AccountAppState<S>>,
    Extension(ctx): Extension<AuthContext>,
) -> AccountResult<Json<Vec<ListView>>>
where
    S: AccountStore + Clone + Send + Sync + 'static,
{
    let manager = ListManager::new(state.store.clone());
    Ok(Json(manager.list_all(&ctx.user_id).await?))
}

/// POST /api/lists
pub async fn create_list<S>(
    State(state): State<AccountAppState<S>>,
    Extension(ctx): Extension<AuthContext>,
    ValidJson(draft): ValidJson<CreateListRequest>,
) -> AccountResult<impl IntoResponse>
where
    S: AccountStore + Clone + Send + Sync + 'static,
{
    let manager = ListManager::new(state.store.clone());
    let list = manager.create(&ctx.user_id, draft).await?;

    Ok((StatusCode::CREATED, Json(list)))
}

/// GET /api/lists/{list_id}
pub async fn get_list<S>(
    State(state): State<AccountAppState<S>>,
    Extension(ctx): Extension<AuthContext>,
    Path(list_id): Path<String>,
) -> AccountResult<Json<ListView>>
where
    S: AccountStore + Clone + Send + Sync + 'static,
{
    let list_id = parse_list_id(&list_id)?;
    let manager = ListManager::new(state.store.clone());
    Ok(Json(manager.get(&ctx.user_id, list_id).await?))
}

/// PATCH /api/lists/{list_id}
pub async fn update_list<S>(
    State(state): State<AccountAppState<S>>,
    Extension(ctx): Extension<AuthContext>,
    Path(list_id): Path<String>,
    ValidJson(changes): ValidJson<UpdateListRequest>,
) -> AccountResult<Json<ListView>>
where
    S: AccountStore + Clone + Send + Sync + 'static,
{
    let list_id = parse_list_id(&list_id)?;
    let manager = ListManager::new(state.store.clone());
    Ok(Json(manager.update(&ctx.user_id, list_id, changes).await?))
}

/// DELETE /api/lists/{list_id}
pub async fn delete_list<S>(
    State(state): State<AccountAppState<S>>,
    Extension(ctx): Extension<AuthContext>,
    Path(list_id): Path<String>,
) -> AccountResult<StatusCode>
where
    S: AccountStore + Clone + Send + Sync + 'static,
{
    let list_id = parse_list_id(&list_id)?;
    let manager = ListManager::new(state.store.clone());
    manager.delete(&ctx.user_id, list_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/lists/{list_id}/games
pub async fn add_list_game<S>(
    State(state): State<AccountAppState<S>>,
    Extension(ctx): Extension<AuthContext>,
    Path(list_id): Path<String>,
    ValidJson(game): ValidJson<GameRequest>,
) -> AccountResult<Json<ListView>>
where
    S: AccountStore + Clone + Send + Sync + 'static,
{
    let list_id = parse_list_id(&list_id)?;
    let manager = ListManager::new(state.store.clone());
    Ok(Json(manager.add_game(&ctx.user_id, list_id, game).await?))
}

/// DELETE /api/lists/{list_id}/games/{game_id}
pub async fn remove_list_game<S>(
    State(state): State<AccountAppState<S>>,
    Extension(ctx): Extension<AuthContext>,
    Path((list_id, game_id)): Path<(String, String)>,
) -> AccountResult<Json<ListView>>
where
    S: AccountStore + Clone + Send + Sync + 'static,
{
    let list_id = parse_list_id(&list_id)?;
    let game_id = parse_game_id(&game_id)?;
    let manager = ListManager::new(state.store.clone());
    Ok(Json(manager.remove_game(&ctx.user_id, list_id, game_id).await?))
}

// ============================================================================
// Public profiles
// ============================================================================

/// GET /api/profiles/{id_or_username}
pub async fn public_profile<S>(
    State(state): State<AccountAppState<S>>,
    Extension(viewer): Extension<Viewer>,
    Path(id_or_username): Path<String>,
) -> AccountResult<Json<ProfileView>>
where
    S: AccountStore + Clone + Send + Sync + 'static,
{
    let service = ProfileService::new(state.store.clone(), state.config.clone());
    Ok(Json(service.public_profile(&id_or_username, viewer).await?))
}

/// GET /api/profiles?q=
pub async fn search_profiles<S>(
    State(state): State<AccountAppState<S>>,
    Extension(viewer): Extension<Viewer>,
    Query(query): Query<SearchQuery>,
) -> AccountResult<Json<Vec<ProfileView>>>
where
    S: AccountStore + Clone + Send + Sync + 'static,
{
    let service = ProfileService::new(state.store.clone(), state.config.clone());
    Ok(Json(service.search(&query.q, viewer).await?))
}
