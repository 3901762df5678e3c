use crate::error::Error;
use crate::{messages, users, PublicId};
use entity_api::{message, user};
use events::{DomainEvent, EventPublisher};
use log::*;
use sea_orm::DatabaseConnection;

/// Largest page of conversation history a single request may ask for.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Stores a direct message from `sender` to the user identified by `receiver_uuid`,
/// then announces it so a connected receiver is notified in real time.
///
/// Notification is best effort. The message is already committed by the time the
/// event is published, and an offline receiver reads it from history later.
pub async fn send(
    db: &DatabaseConnection,
    event_publisher: &EventPublisher,
    sender: &users::Model,
    receiver_uuid: PublicId,
    text: &str,
) -> Result<messages::Model, Error> {
    if text.trim().is_empty() {
        warn!("User {} tried to send an empty message", sender.uuid);
        return Err(Error::invalid());
    }

    let receiver = user::find_by_uuid(db, receiver_uuid).await?;
    let message = message::create(db, sender.id, receiver.id, text).await?;

    debug!(
        "Stored message {} from {} to {}",
        message.uuid, sender.uuid, receiver.uuid
    );

    event_publisher
        .publish(DomainEvent::MessageSent {
            message_id: message.uuid,
            sender_id: sender.id,
            text: message.text.clone(),
            created_at: message.created_at.timestamp(),
            notify_user_ids: vec![receiver.id],
        })
        .await;

    Ok(message)
}

/// Messages the user identified by `with_uuid` sent to `user`, oldest first.
pub async fn find_conversation(
    db: &DatabaseConnection,
    user: &users::Model,
    with_uuid: PublicId,
    limit: u64,
    offset: u64,
) -> Result<Vec<messages::Model>, Error> {
    if !(1..=MAX_PAGE_SIZE).contains(&limit) {
        warn!("Rejected conversation page size {limit}");
        return Err(Error::invalid());
    }

    let sender = user::find_by_uuid(db, with_uuid).await?;
    Ok(message::find_conversation(db, user.id, sender.id, limit, offset).await?)
}

// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, EntityErrorKind, InternalErrorKind};
    use async_trait::async_trait;
    use chrono::Utc;
    use events::EventHandler;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    #[derive(Default)]
    struct RecordingHandler {
        events: Mutex<Vec<DomainEvent>>,
    }

    #[async_trait]
    impl EventHandler for RecordingHandler {
        async fn handle(&self, event: &DomainEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    fn user(id: i32, nickname: &str) -> users::Model {
        let now = Utc::now();
        users::Model {
            id,
            uuid: Uuid::new_v4(),
            nickname: nickname.to_string(),
            password: "hash".to_string(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn stored_message(sender_id: i32, receiver_id: i32, text: &str) -> messages::Model {
        let now = Utc::now();
        messages::Model {
            id: 1,
            uuid: Uuid::new_v4(),
            sender_id,
            receiver_id,
            text: text.to_string(),
            created_at: now.into(),
            updated_at: now.into(),
            deleted_at: None,
        }
    }

    fn entity_kind(err: Error) -> EntityErrorKind {
        let DomainErrorKind::Internal(InternalErrorKind::Entity(kind)) = err.error_kind;
        kind
    }

    #[tokio::test]
    async fn send_stores_message_and_notifies_receiver() -> Result<(), Error> {
        let alice = user(1, "alice");
        let bob = user(2, "bob");
        let stored = stored_message(alice.id, bob.id, "hi bob");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![bob.clone()]])
            .append_query_results([vec![stored.clone()]])
            .into_connection();
        let handler = Arc::new(RecordingHandler::default());
        let publisher = EventPublisher::new().with_handler(handler.clone());

        let message = send(&db, &publisher, &alice, bob.uuid, "hi bob").await?;

        assert_eq!(message, stored);
        let events = handler.events.lock().unwrap();
        assert_eq!(
            *events,
            vec![DomainEvent::MessageSent {
                message_id: stored.uuid,
                sender_id: alice.id,
                text: "hi bob".to_string(),
                created_at: stored.created_at.timestamp(),
                notify_user_ids: vec![bob.id],
            }]
        );
        Ok(())
    }

    #[tokio::test]
    async fn send_to_unknown_receiver_is_not_found() {
        let alice = user(1, "alice");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();
        let handler = Arc::new(RecordingHandler::default());
        let publisher = EventPublisher::new().with_handler(handler.clone());

        let err = send(&db, &publisher, &alice, Uuid::new_v4(), "hello?")
            .await
            .unwrap_err();

        assert_eq!(entity_kind(err), EntityErrorKind::NotFound);
        assert!(handler.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn send_rejects_blank_text() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let alice = user(1, "alice");

        let err = send(&db, &EventPublisher::new(), &alice, Uuid::new_v4(), "  ")
            .await
            .unwrap_err();

        assert_eq!(entity_kind(err), EntityErrorKind::Invalid);
    }

    #[tokio::test]
    async fn find_conversation_rejects_out_of_range_limit() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let alice = user(1, "alice");

        for limit in [0, MAX_PAGE_SIZE + 1] {
            let err = find_conversation(&db, &alice, Uuid::new_v4(), limit, 0)
                .await
                .unwrap_err();
            assert_eq!(entity_kind(err), EntityErrorKind::Invalid);
        }
    }

    #[tokio::test]
    async fn find_conversation_returns_messages_from_sender() -> Result<(), Error> {
        let alice = user(1, "alice");
        let bob = user(2, "bob");
        let history = vec![
            stored_message(bob.id, alice.id, "first"),
            stored_message(bob.id, alice.id, "second"),
        ];
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![bob.clone()]])
            .append_query_results([history.clone()])
            .into_connection();

        let conversation = find_conversation(&db, &alice, bob.uuid, 20, 0).await?;

        assert_eq!(conversation, history);
        Ok(())
    }
}
