use crate::controller::ApiResponse;
use crate::params::user::Credentials;
use crate::{AppState, Error};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use domain::{user as UserApi, users};
use log::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct SessionResponse {
    /// Present as `Authorization: Bearer <session_key>` or as the `session_key`
    /// query parameter on later requests.
    session_key: String,
    user: users::Model,
}

/// Logs a user in and hands back a fresh session key.
///
/// Every successful login opens a new session, so the same account can stay
/// signed in on several devices at once.
#[utoipa::path(
    post,
    path = "/login",
    request_body = Credentials,
    responses(
        (status = 200, description = "Logged in", body = SessionResponse),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "Unknown nickname")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<impl IntoResponse, Error> {
    let (session, user) = UserApi::login(
        app_state.db_conn_ref(),
        &credentials.nickname,
        &credentials.password,
    )
    .await?;

    info!("User {} logged in", user.uuid);

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        SessionResponse {
            session_key: session.session_key,
            user,
        },
    )))
}
