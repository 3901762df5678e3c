use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::AppState;
use async_stream::stream;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use log::*;
use std::convert::Infallible;
use tokio::sync::mpsc;

/// GET a long-lived `text/event-stream` of notifications for the caller
///
/// Each stored message addressed to the caller arrives as a `new_message` event.
/// Browsers pass the session key as the `session_key` query parameter.
#[utoipa::path(
    get,
    path = "/events/subscribe",
    params(
        ("session_key" = Option<String>, Query, description = "Session key for clients that cannot set headers")
    ),
    responses(
        (status = 200, description = "Event stream opened", content_type = "text/event-stream"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Subscription could not be allocated")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub(crate) async fn subscribe(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Response {
    debug!("Establishing SSE connection for user {}", user.uuid);

    let (tx, mut rx) = mpsc::unbounded_channel::<Result<Event, Infallible>>();

    // The delivery thread owns `tx`. Once this response is dropped its next
    // write fails and it releases the slot itself.
    let index = match app_state.sse_manager.subscribe(user.id, tx) {
        Ok(index) => index,
        Err(e) => {
            error!("Could not subscribe user {}: {e}", user.uuid);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to register subscription",
            )
                .into_response();
        }
    };

    let user_uuid = user.uuid;
    let stream = stream! {
        while let Some(event) = rx.recv().await {
            yield event;
        }
        debug!("SSE stream for user {user_uuid} on slot {index} ended");
    };

    (
        // Keeps reverse proxies from holding frames back.
        [("x-accel-buffering", "no"), ("cache-control", "no-cache")],
        Sse::new(stream).keep_alive(KeepAlive::new().interval(app_state.config.sse_keep_alive())),
    )
        .into_response()
}
