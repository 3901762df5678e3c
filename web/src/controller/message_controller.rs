use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::message::{IndexParams, SendParams};
use crate::{AppState, Error};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::{message as MessageApi, messages};
use log::*;

/// SEND a direct message
///
/// A receiver with an open event stream is notified right away with a
/// `new_message` event.
#[utoipa::path(
    post,
    path = "/send",
    request_body = SendParams,
    responses(
        (status = 201, description = "Message stored", body = messages::Model),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown receiver"),
        (status = 422, description = "Empty message")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(params): Json<SendParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("SEND message from {} to {}", user.uuid, params.receiver_uuid);

    let message = MessageApi::send(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        &user,
        params.receiver_uuid,
        &params.msg,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), message)),
    ))
}

/// INDEX messages another user sent to the caller, oldest first
#[utoipa::path(
    get,
    path = "/messages",
    params(IndexParams),
    responses(
        (status = 200, description = "One page of conversation history", body = [messages::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown user"),
        (status = 422, description = "Page size out of range")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    let messages = MessageApi::find_conversation(
        app_state.db_conn_ref(),
        &user,
        params.user_uuid,
        params.limit,
        params.offset,
    )
    .await?;

    debug!(
        "Found {} messages from {} to {}",
        messages.len(),
        params.user_uuid,
        user.uuid
    );

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), messages)))
}
