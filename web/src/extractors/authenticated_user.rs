use crate::{AppState, Error};
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Query},
    http::{header::AUTHORIZATION, request::Parts},
};
use domain::{user as UserApi, users};
use log::*;
use serde::Deserialize;

pub(crate) struct AuthenticatedUser(pub users::Model);

#[derive(Deserialize)]
struct SessionKeyParam {
    session_key: Option<String>,
}

/// Finds the session key on a request. The `Authorization: Bearer` header wins;
/// the `session_key` query parameter exists for `EventSource`, which cannot set headers.
fn session_key(parts: &Parts) -> Option<String> {
    let from_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string);

    from_header.or_else(|| {
        Query::<SessionKeyParam>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(param)| param.session_key)
            .filter(|key| !key.is_empty())
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    /// Rejects with 401 when the key is missing or resolves to no session.
    /// Lookup failures such as a lost database connection surface as 500.
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(key) = session_key(parts) else {
            return Err(Error::unauthenticated());
        };

        let app_state = AppState::from_ref(state);
        let user = UserApi::find_by_session_key(app_state.db_conn_ref(), &key)
            .await
            .inspect_err(|e| debug!("Session key lookup failed: {e}"))?;

        trace!("Authenticated request for user {}", user.uuid);
        Ok(AuthenticatedUser(user))
    }
}
