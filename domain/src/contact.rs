use crate::error::Error;
use crate::{users, PublicId};
use entity_api::message;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;

/// Someone who has written to the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Contact {
    #[schema(value_type = String, format = Uuid)]
    pub uuid: PublicId,
    pub nickname: String,
}

impl From<users::Model> for Contact {
    fn from(user: users::Model) -> Self {
        Self {
            uuid: user.uuid,
            nickname: user.nickname,
        }
    }
}

/// Every distinct sender of a message to `user`.
pub async fn find_by_user(
    db: &DatabaseConnection,
    user: &users::Model,
) -> Result<Vec<Contact>, Error> {
    let senders = message::find_senders(db, user.id).await?;
    Ok(senders.into_iter().map(Contact::from).collect())
}
