use crate::message::{Event as SseEvent, MessageNotification};
use crate::Manager;
use async_trait::async_trait;
use events::{DomainEvent, EventHandler};
use log::*;
use std::sync::Arc;

/// Handles domain events by converting them to SSE notifications and
/// publishing them to the users named in the event.
///
/// The domain layer decides who gets notified. Delivery is best effort: an
/// offline recipient simply misses the notification and sees the message the
/// next time it loads the conversation.
pub struct SseDomainEventHandler {
    sse_manager: Arc<Manager>,
}

impl SseDomainEventHandler {
    pub fn new(sse_manager: Arc<Manager>) -> Self {
        Self { sse_manager }
    }

    fn send_to_users(&self, sse_event: SseEvent, user_ids: &[events::Id]) {
        let mut delivered = 0;
        for user_id in user_ids {
            if self.sse_manager.notify_user(*user_id, sse_event.clone()) {
                delivered += 1;
            } else {
                debug!("User {user_id} is not subscribed, notification dropped");
            }
        }

        debug!(
            "Sent SSE event to {delivered} of {} user(s): {:?}",
            user_ids.len(),
            user_ids
        );
    }
}

#[async_trait]
impl EventHandler for SseDomainEventHandler {
    async fn handle(&self, event: &DomainEvent) {
        match event {
            DomainEvent::MessageSent {
                message_id,
                sender_id,
                text,
                created_at,
                notify_user_ids,
            } => {
                debug!("Handling MessageSent event {message_id} from user {sender_id}");

                let sse_event = SseEvent::new_message(MessageNotification {
                    id: message_id.to_string(),
                    text: text.clone(),
                    created_at: *created_at,
                });

                self.send_to_users(sse_event, notify_user_ids);
            }
        }
    }
}
