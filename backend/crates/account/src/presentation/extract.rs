//! Request Extractors

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::error::AccountError;
use crate::presentation::dto::ValidateRequest;

/// JSON body that has passed [`ValidateRequest`].
///
/// Malformed JSON and field failures both reject with a 400 naming the
/// offending field(s), before any use case runs.
pub struct ValidJson<T: ValidateRequest>(pub T::Valid);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: ValidateRequest + DeserializeOwned + Send,
{
    type Rejection = AccountError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AccountError::validation("body", rejection.body_text()))?;
        Ok(ValidJson(raw.validate()?))
    }
}
