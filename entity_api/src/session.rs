use super::error::Error;
use chrono::Utc;
use entity::sessions::{ActiveModel, Column, Model};
use entity::{sessions, users, Id};
use log::*;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;

/// Opens a new session for `user_id` with a freshly generated random key.
pub async fn create(db: &impl ConnectionTrait, user_id: Id) -> Result<Model, Error> {
    debug!("Creating session for user {user_id}");

    let session_active_model = ActiveModel {
        session_key: Set(Uuid::new_v4().to_string()),
        user_id: Set(user_id),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };

    Ok(session_active_model.insert(db).await?)
}

/// Resolves a session key to the user that owns it.
pub async fn find_user_by_session_key(
    db: &impl ConnectionTrait,
    session_key: &str,
) -> Result<Option<users::Model>, Error> {
    Ok(users::Entity::find()
        .inner_join(sessions::Entity)
        .filter(Column::SessionKey.eq(session_key))
        .one(db)
        .await?)
}
