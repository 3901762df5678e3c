use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::{AppState, Error};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use domain::contact::{self as ContactApi, Contact};
use log::*;

/// GET everyone who has sent the caller a message
#[utoipa::path(
    get,
    path = "/contacts",
    responses(
        (status = 200, description = "Distinct senders of messages to the caller", body = [Contact]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let contacts = ContactApi::find_by_user(app_state.db_conn_ref(), &user).await?;

    debug!("Found {} contacts for user {}", contacts.len(), user.uuid);

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), contacts)))
}
