use crate::bus::EventBus;
use crate::delivery::{DeliveryLoop, Transport};
use crate::error::Result;
use crate::message::Event;
use crate::slot::{SlotIndex, UserId};
use log::*;
use std::sync::Arc;
use std::time::Duration;

/// High-level entry point used by the web layer: opens subscriptions with
/// their delivery threads and pushes notifications to users.
pub struct Manager {
    bus: Arc<EventBus>,
    retry_backoff: Duration,
}

impl Manager {
    pub fn new(bus: Arc<EventBus>, retry_backoff: Duration) -> Self {
        Self { bus, retry_backoff }
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Registers a slot for `user_id` and starts its delivery thread.
    pub fn subscribe<T>(&self, user_id: UserId, transport: T) -> Result<SlotIndex>
    where
        T: Transport + 'static,
    {
        let index = self.bus.register_subscriber(user_id)?;

        let delivery = DeliveryLoop::new(Arc::clone(&self.bus), index, transport, self.retry_backoff);
        if let Err(e) = delivery.spawn() {
            error!("Failed to start delivery for user {user_id} on slot {index}: {e}");
            self.bus.disconnect(index);
            return Err(e);
        }

        info!("Registered new SSE subscription for user {user_id} on slot {index}");
        Ok(index)
    }

    /// Best-effort notification. Returns whether at least one connected slot
    /// received the event; failures are logged, never propagated.
    pub fn notify_user(&self, user_id: UserId, event: Event) -> bool {
        match self.bus.publish(user_id, &event) {
            Ok(delivered) => delivered,
            Err(e) => {
                error!("Failed to publish event to user {user_id}: {e}");
                false
            }
        }
    }
}
