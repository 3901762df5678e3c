use serde::Deserialize;
use utoipa::ToSchema;

/// Body of both `POST /register` and `POST /login`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct Credentials {
    pub nickname: String,
    pub password: String,
}
