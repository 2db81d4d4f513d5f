//! Request Gate
//!
//! `require_auth` guards private routes; `identify_viewer` resolves an
//! optional caller for public profile reads.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;

use crate::application::SessionAuthority;
use crate::domain::projection::Viewer;
use crate::domain::repository::AccountStore;
use crate::error::AccountError;
use crate::presentation::handlers::AccountAppState;

/// Token from `Authorization: Bearer <token>`, if well-formed
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() || token.contains(' ') {
        return None;
    }
    Some(token)
}

/// Middleware that requires a valid credential for an active account.
/// Stores the resolved [`AuthContext`](crate::application::AuthContext)
/// in request extensions.
pub async fn require_auth<S>(
    State(state): State<AccountAppState<S>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AccountError>
where
    S: AccountStore + Clone + Send + Sync + 'static,
{
    let token = bearer_token(req.headers()).ok_or(AccountError::AuthenticationMissing)?;

    let authority = SessionAuthority::new(state.store.clone(), state.config.clone());
    let context = authority.authenticate(token).await?;

    req.extensions_mut().insert(context);
    Ok(next.run(req).await)
}

/// Middleware that identifies the caller when it can and never rejects.
/// An absent or unusable credential means an anonymous viewer.
pub async fn identify_viewer<S>(
    State(state): State<AccountAppState<S>>,
    mut req: Request,
    next: Next,
) -> Response
where
    S: AccountStore + Clone + Send + Sync + 'static,
{
    let viewer = match bearer_token(req.headers()) {
        Some(token) => {
            let authority = SessionAuthority::new(state.store.clone(), state.config.clone());
            match authority.authenticate(token).await {
                Ok(context) => Viewer::User(context.user_id),
                Err(e) => {
                    tracing::debug!(error = %e, "Treating caller as anonymous");
                    Viewer::Anonymous
                }
            }
        }
        None => Viewer::Anonymous,
    };

    req.extensions_mut().insert(viewer);
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers("bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Bearer a b")), None);
        assert_eq!(bearer_token(&headers("abc.def")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
