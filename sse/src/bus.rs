use crate::error::{Error, ErrorKind, Result};
use crate::message::Event;
use crate::slot::{SlotIndex, SlotRegistry, UserId};
use log::*;

/// Routes events from producers to the blocked consumers of each user's
/// subscription slots.
///
/// One instance is built by the composition root and shared behind an `Arc`.
#[derive(Debug, Default)]
pub struct EventBus {
    registry: SlotRegistry,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            registry: SlotRegistry::new(),
        }
    }

    /// Opens a subscription slot for `user_id`, reusing a disconnected slot
    /// when there is one.
    pub fn register_subscriber(&self, user_id: UserId) -> Result<SlotIndex> {
        trace!("Registering subscriber for user {user_id}");
        let index = self.registry.register(user_id)?;
        debug!("User {user_id} subscribed on slot {index}");
        Ok(index)
    }

    /// Queues a copy of `event` on every connected slot owned by `user_id`.
    ///
    /// Returns `Ok(false)` when the user has no connected slot; the event is
    /// dropped in that case.
    pub fn publish(&self, user_id: UserId, event: &Event) -> Result<bool> {
        trace!("Publishing event for user {user_id}");

        let delivered = self.registry.with_slots(|slots| -> Result<usize> {
            let mut delivered = 0;
            for (index, slot) in slots.iter().enumerate() {
                if slot.offer(user_id, event)? {
                    trace!("Queued event for user {user_id} on slot {index}");
                    delivered += 1;
                }
            }
            Ok(delivered)
        })?;

        if delivered == 0 {
            warn!("User {user_id} has no connected subscriber slot");
            return Ok(false);
        }

        trace!("Event for user {user_id} queued on {delivered} slot(s)");
        Ok(true)
    }

    pub fn disconnect(&self, index: SlotIndex) {
        trace!("Disconnecting slot {index}");
        self.registry.disconnect(index);
    }

    /// Blocks the calling thread until the slot at `index` has an event.
    ///
    /// An out-of-range or disconnected slot is an immediate error. The wait
    /// ends early only if the slot is disconnected underneath it.
    pub fn wait_for_event(&self, index: SlotIndex) -> Result<Event> {
        let Some(slot) = self.registry.get(index) else {
            warn!("Slot {index} is out of range");
            return Err(Error::new(ErrorKind::InvalidSlot));
        };

        trace!("Waiting for event on slot {index}");
        let event = slot.wait().inspect_err(|e| {
            warn!("Wait on slot {index} failed: {e}");
        })?;
        trace!("Event retrieved from slot {index}");

        Ok(event)
    }

    /// Number of events waiting on the slot, `None` if it does not exist.
    pub fn pending(&self, index: SlotIndex) -> Option<usize> {
        self.registry.get(index).map(|slot| slot.pending())
    }

    pub fn slot_count(&self) -> usize {
        self.registry.len()
    }

    pub fn connected_count(&self) -> usize {
        self.registry.connected_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageNotification;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn message(id: &str, text: &str, created_at: i64) -> Event {
        Event::new_message(MessageNotification {
            id: id.to_string(),
            text: text.to_string(),
            created_at,
        })
    }

    #[test]
    fn published_event_is_returned_to_the_subscriber() {
        let bus = EventBus::new();
        let index = bus.register_subscriber(42).unwrap();
        assert_eq!(index, SlotIndex::new(0));

        let event = message("abc", "hi", 1000);
        assert!(bus.publish(42, &event).unwrap());

        assert_eq!(bus.wait_for_event(index).unwrap(), event);
        assert!(!bus.publish(99, &event).unwrap());
    }

    #[test]
    fn events_are_received_in_publish_order() {
        let bus = EventBus::new();
        let index = bus.register_subscriber(1).unwrap();

        let events: Vec<_> = (0..10)
            .map(|i| message(&format!("id-{i}"), &format!("text {i}"), i))
            .collect();
        for event in &events {
            bus.publish(1, event).unwrap();
        }

        let received: Vec<_> = (0..10).map(|_| bus.wait_for_event(index).unwrap()).collect();
        assert_eq!(received, events);
    }

    #[test]
    fn publish_only_reaches_the_target_user() {
        let bus = EventBus::new();
        let alice = bus.register_subscriber(1).unwrap();
        let bob = bus.register_subscriber(2).unwrap();

        bus.publish(2, &message("m1", "for bob", 1)).unwrap();

        assert_eq!(bus.pending(alice), Some(0));
        assert_eq!(bus.pending(bob), Some(1));
    }

    #[test]
    fn publish_fans_out_to_every_slot_of_the_user() {
        let bus = EventBus::new();
        let phone = bus.register_subscriber(5).unwrap();
        let laptop = bus.register_subscriber(5).unwrap();

        let event = message("m1", "both devices", 1);
        assert!(bus.publish(5, &event).unwrap());

        assert_eq!(bus.wait_for_event(phone).unwrap(), event);
        assert_eq!(bus.wait_for_event(laptop).unwrap(), event);
    }

    #[test]
    fn reused_slot_starts_with_an_empty_queue() {
        let bus = EventBus::new();
        let index = bus.register_subscriber(1).unwrap();
        bus.publish(1, &message("stale", "old", 1)).unwrap();
        bus.disconnect(index);

        let reused = bus.register_subscriber(2).unwrap();
        assert_eq!(reused, index);
        assert_eq!(bus.pending(reused), Some(0));

        let fresh = message("fresh", "new", 2);
        bus.publish(2, &fresh).unwrap();
        assert_eq!(bus.wait_for_event(reused).unwrap(), fresh);
    }

    #[test]
    fn publish_to_disconnected_user_is_not_delivered() {
        let bus = EventBus::new();
        let index = bus.register_subscriber(3).unwrap();
        bus.disconnect(index);

        assert!(!bus.publish(3, &message("m", "late", 1)).unwrap());
        assert_eq!(bus.pending(index), Some(0));
    }

    #[test]
    fn wait_on_invalid_slot_fails_immediately() {
        let bus = EventBus::new();

        let err = bus.wait_for_event(SlotIndex::new(3)).unwrap_err();
        assert_eq!(err.error_kind, ErrorKind::InvalidSlot);

        let index = bus.register_subscriber(1).unwrap();
        bus.disconnect(index);
        let err = bus.wait_for_event(index).unwrap_err();
        assert_eq!(err.error_kind, ErrorKind::InvalidSlot);
    }

    #[test]
    fn disconnect_with_invalid_index_is_ignored() {
        let bus = EventBus::new();
        bus.register_subscriber(1).unwrap();

        bus.disconnect(SlotIndex::new(9));
        bus.disconnect(SlotIndex::new(0));
        bus.disconnect(SlotIndex::new(0));

        assert_eq!(bus.slot_count(), 1);
        assert_eq!(bus.connected_count(), 0);
    }

    #[test]
    fn waiting_consumer_wakes_on_publish() {
        let bus = Arc::new(EventBus::new());
        let index = bus.register_subscriber(8).unwrap();

        let consumer = {
            let bus = Arc::clone(&bus);
            thread::spawn(move || bus.wait_for_event(index))
        };

        thread::sleep(Duration::from_millis(50));
        let event = message("late", "wake up", 3);
        bus.publish(8, &event).unwrap();

        assert_eq!(consumer.join().unwrap().unwrap(), event);
    }

    #[test]
    fn waiting_consumer_wakes_on_disconnect() {
        let bus = Arc::new(EventBus::new());
        let index = bus.register_subscriber(8).unwrap();

        let consumer = {
            let bus = Arc::clone(&bus);
            thread::spawn(move || bus.wait_for_event(index))
        };

        thread::sleep(Duration::from_millis(50));
        bus.disconnect(index);

        let err = consumer.join().unwrap().unwrap_err();
        assert_eq!(err.error_kind, ErrorKind::Disconnected);
    }

    #[test]
    fn concurrent_publish_and_consume_loses_nothing() {
        const COUNT: i64 = 1000;

        let bus = Arc::new(EventBus::new());
        let index = bus.register_subscriber(11).unwrap();

        let producer = {
            let bus = Arc::clone(&bus);
            thread::spawn(move || {
                for i in 0..COUNT {
                    assert!(bus.publish(11, &message(&i.to_string(), "load", i)).unwrap());
                }
            })
        };

        let consumer = {
            let bus = Arc::clone(&bus);
            thread::spawn(move || {
                (0..COUNT)
                    .map(|_| bus.wait_for_event(index).unwrap())
                    .collect::<Vec<_>>()
            })
        };

        producer.join().unwrap();
        let received = consumer.join().unwrap();

        assert_eq!(received.len(), COUNT as usize);
        for (i, event) in received.iter().enumerate() {
            assert_eq!(*event, message(&i.to_string(), "load", i as i64));
        }
        assert_eq!(bus.pending(index), Some(0));
    }

    #[test]
    fn registration_while_publishing_is_safe() {
        let bus = Arc::new(EventBus::new());
        let index = bus.register_subscriber(1).unwrap();

        let registrar = {
            let bus = Arc::clone(&bus);
            thread::spawn(move || {
                for user_id in 100..300 {
                    bus.register_subscriber(user_id).unwrap();
                }
            })
        };

        for i in 0..200 {
            bus.publish(1, &message(&i.to_string(), "x", i)).unwrap();
        }
        registrar.join().unwrap();

        assert_eq!(bus.slot_count(), 201);
        assert_eq!(bus.pending(index), Some(200));
    }
}
