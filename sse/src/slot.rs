//! Subscriber slots and the growable table that holds them.
//!
//! Lock order is always table lock, then slot lock. Nothing that holds a slot
//! lock ever reaches back for the table lock.

use crate::error::{Error, ErrorKind, Result};
use crate::message::Event;
use crate::queue::Queue;
use log::*;
use parking_lot::{Condvar, Mutex, RwLock};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Internal user identifier, as stored in the `users` table.
pub type UserId = events::Id;

/// Position of a slot in the table. Stable for as long as the owning
/// subscription stays connected; recycled for another user afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SlotIndex(usize);

impl SlotIndex {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
struct SlotState {
    connected: bool,
    user_id: UserId,
    queue: Queue<Event>,
}

/// One user's live subscription: its pending events plus the primitives a
/// consumer blocks on.
#[derive(Debug)]
pub struct Slot {
    state: Mutex<SlotState>,
    available: Condvar,
}

impl Slot {
    fn connected(user_id: UserId) -> Self {
        Self {
            state: Mutex::new(SlotState {
                connected: true,
                user_id,
                queue: Queue::new(),
            }),
            available: Condvar::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock().connected
    }

    pub fn user_id(&self) -> UserId {
        self.state.lock().user_id
    }

    pub fn pending(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Enqueues a copy of `event` if this slot is a live subscription for
    /// `user_id`. Returns whether the slot matched.
    pub(crate) fn offer(&self, user_id: UserId, event: &Event) -> Result<bool> {
        let mut state = self.state.lock();
        if !state.connected || state.user_id != user_id {
            return Ok(false);
        }

        state.queue.enqueue(event.clone())?;
        self.available.notify_one();
        Ok(true)
    }

    /// Blocks until an event is queued and returns it.
    ///
    /// Fails immediately if the slot is not connected, and with
    /// `Disconnected` if it gets disconnected while waiting.
    pub(crate) fn wait(&self) -> Result<Event> {
        let mut state = self.state.lock();
        if !state.connected {
            return Err(Error::new(ErrorKind::InvalidSlot));
        }

        loop {
            if let Some(event) = state.queue.dequeue() {
                return Ok(event);
            }
            if !state.connected {
                return Err(Error::new(ErrorKind::Disconnected));
            }
            self.available.wait(&mut state);
        }
    }

    /// Marks the slot disconnected and drops whatever was still queued.
    fn release(&self) -> bool {
        let mut state = self.state.lock();
        if !state.connected {
            return false;
        }

        state.connected = false;
        state.queue = Queue::new();
        self.available.notify_all();
        true
    }
}

/// Growable table of subscriber slots.
///
/// The `RwLock` guards the table's shape: `register` and `disconnect` take it
/// for writing, lookups and publish iteration take it for reading. Slot
/// contents are guarded by each slot's own mutex.
#[derive(Debug, Default)]
pub struct SlotRegistry {
    slots: RwLock<Vec<Arc<Slot>>>,
}

impl SlotRegistry {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(Vec::new()),
        }
    }

    /// Claims the first disconnected slot, or appends a new one.
    ///
    /// A reused position gets a brand-new `Slot`, so nothing queued for the
    /// previous occupant can leak to the new one.
    pub fn register(&self, user_id: UserId) -> Result<SlotIndex> {
        let mut slots = self.slots.write();

        if let Some(index) = slots.iter().position(|slot| !slot.is_connected()) {
            trace!("Reusing slot {index} for user {user_id}");
            slots[index] = Arc::new(Slot::connected(user_id));
            return Ok(SlotIndex(index));
        }

        slots.try_reserve(1)?;
        slots.push(Arc::new(Slot::connected(user_id)));
        let index = slots.len() - 1;
        trace!("Appended slot {index} for user {user_id}, table size {}", slots.len());

        Ok(SlotIndex(index))
    }

    /// Disconnects the slot at `index`. Out-of-range or already disconnected
    /// indices are logged and otherwise ignored.
    pub fn disconnect(&self, index: SlotIndex) -> bool {
        let slots = self.slots.write();

        match slots.get(index.0) {
            Some(slot) => {
                let released = slot.release();
                if released {
                    trace!("Slot {index} disconnected");
                } else {
                    warn!("Slot {index} is already disconnected");
                }
                released
            }
            None => {
                warn!("Slot {index} is out of range (table size {})", slots.len());
                false
            }
        }
    }

    pub fn get(&self, index: SlotIndex) -> Option<Arc<Slot>> {
        self.slots.read().get(index.0).cloned()
    }

    /// Runs `f` over the current table while holding the read lock, so the
    /// table cannot be reshaped underneath it.
    pub(crate) fn with_slots<R>(&self, f: impl FnOnce(&[Arc<Slot>]) -> R) -> R {
        let slots = self.slots.read();
        f(&slots)
    }

    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }

    pub fn connected_count(&self) -> usize {
        self.slots
            .read()
            .iter()
            .filter(|slot| slot.is_connected())
            .count()
    }
}
