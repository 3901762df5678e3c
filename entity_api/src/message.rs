use super::error::Error;
use chrono::Utc;
use entity::messages::{ActiveModel, Column, Entity, Model, Relation};
use entity::{users, Id};
use log::*;
use sea_orm::{
    entity::prelude::*, ConnectionTrait, JoinType, QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

pub async fn create(
    db: &impl ConnectionTrait,
    sender_id: Id,
    receiver_id: Id,
    text: &str,
) -> Result<Model, Error> {
    debug!("New message from user {sender_id} to user {receiver_id}");

    let now = Utc::now();
    let message_active_model = ActiveModel {
        uuid: Set(Uuid::new_v4()),
        sender_id: Set(sender_id),
        receiver_id: Set(receiver_id),
        text: Set(text.to_string()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        deleted_at: Set(None),
        ..Default::default()
    };

    Ok(message_active_model.insert(db).await?)
}

/// Messages `sender_id` sent to `receiver_id`, oldest first, skipping
/// soft-deleted ones.
pub async fn find_conversation(
    db: &impl ConnectionTrait,
    receiver_id: Id,
    sender_id: Id,
    limit: u64,
    offset: u64,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::ReceiverId.eq(receiver_id))
        .filter(Column::SenderId.eq(sender_id))
        .filter(Column::DeletedAt.is_null())
        .order_by_asc(Column::CreatedAt)
        .limit(limit)
        .offset(offset)
        .all(db)
        .await?)
}

/// Every distinct user who has sent at least one message to `receiver_id`.
pub async fn find_senders(
    db: &impl ConnectionTrait,
    receiver_id: Id,
) -> Result<Vec<users::Model>, Error> {
    Ok(users::Entity::find()
        .join(JoinType::InnerJoin, Relation::Sender.def().rev())
        .filter(Column::ReceiverId.eq(receiver_id))
        .distinct()
        .order_by_asc(users::Column::Nickname)
        .all(db)
        .await?)
}
