use crate::controller::ApiResponse;
use crate::params::user::Credentials;
use crate::{AppState, Error};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use domain::{user as UserApi, users};
use log::*;

/// CREATE a new account
#[utoipa::path(
    post,
    path = "/register",
    request_body = Credentials,
    responses(
        (status = 201, description = "Successfully registered a new user", body = users::Model),
        (status = 409, description = "Nickname already taken"),
        (status = 422, description = "Nickname or password missing")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<impl IntoResponse, Error> {
    debug!("REGISTER new user {}", credentials.nickname);

    let user = UserApi::register(
        app_state.db_conn_ref(),
        &credentials.nickname,
        &credentials.password,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), user)),
    ))
}
