use crate::controller::{
    contact_controller, health_check_controller, message_controller, user_controller,
    user_session_controller,
};
use crate::{params, sse, AppState};
use axum::{
    routing::{get, post},
    Router,
};

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// Global OpenAPI document. A path or schema only appears in the
// rendered document when it is listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Courier API"
        ),
        paths(
            contact_controller::index,
            health_check_controller::health_check,
            message_controller::create,
            message_controller::index,
            sse::handler::subscribe,
            user_controller::register,
            user_session_controller::login,
        ),
        components(
            schemas(
                domain::contact::Contact,
                domain::messages::Model,
                domain::users::Model,
                params::message::SendParams,
                params::user::Credentials,
                crate::controller::user_session_controller::SessionResponse,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "courier", description = "Direct messaging with real-time notifications")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Session keys returned by /login are sent back as bearer tokens.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Session key returned from a successful login"))
                        .build(),
                ),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(user_routes(app_state.clone()))
        .merge(message_routes(app_state.clone()))
        .merge(contact_routes(app_state.clone()))
        .merge(event_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn user_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/register", post(user_controller::register))
        .route("/login", post(user_session_controller::login))
        .with_state(app_state)
}

fn message_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/send", post(message_controller::create))
        .route("/messages", get(message_controller::index))
        .with_state(app_state)
}

fn contact_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/contacts", get(contact_controller::index))
        .with_state(app_state)
}

fn event_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/events/subscribe", get(sse::handler::subscribe))
        .with_state(app_state)
}
