use domain::PublicId;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

const DEFAULT_LIMIT: u64 = 20;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendParams {
    /// Public id of the recipient.
    #[schema(value_type = String, format = Uuid)]
    pub receiver_uuid: PublicId,
    pub msg: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IndexParams {
    /// Public id of the other participant; messages they sent to the caller are listed.
    #[param(value_type = String, format = Uuid)]
    pub user_uuid: PublicId,
    /// Page size, 1 to 100.
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}
