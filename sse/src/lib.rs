//! Real-time notification delivery over Server-Sent Events.
//!
//! # Architecture
//!
//! - **Slot table**: every open subscription owns a slot holding a FIFO of
//!   pending events, a mutex and a condition variable. Disconnected slots stay
//!   in the table and are handed to the next subscriber, so the table only
//!   grows to the peak number of concurrent subscriptions.
//! - **Event bus**: `publish` copies an event into every connected slot of the
//!   target user (several devices may be subscribed at once) and wakes the
//!   consumer. The table is read-locked while publishing, so registrations
//!   cannot reshape it mid-iteration.
//! - **Delivery threads**: each subscription gets a dedicated OS thread that
//!   blocks in `wait_for_event` and writes frames to the HTTP response
//!   channel. A failed write is the only disconnect signal: the thread then
//!   releases the slot and exits.
//! - **Ephemeral messages**: nothing is stored for offline users; they see new
//!   messages the next time they load a conversation.
//!
//! # Message Flow
//!
//! 1. Client opens `GET /events/subscribe` with its session key
//! 2. `Manager::subscribe` registers a slot and spawns its delivery thread
//! 3. A sender posts a message; the domain layer persists it and publishes a
//!    `DomainEvent::MessageSent`
//! 4. `SseDomainEventHandler` turns it into `Event::NewMessage` and calls
//!    `Manager::notify_user` for the recipient
//! 5. The recipient's delivery thread wakes, serializes the event and writes
//!    `event: new_message` / `data: {...}` to the stream
//!
//! # Modules
//!
//! - `queue`: unbounded FIFO
//! - `slot`: subscriber slots and the slot registry
//! - `bus`: `EventBus` with register / publish / disconnect / wait
//! - `delivery`: the per-subscriber delivery loop and `Transport`
//! - `manager`: wiring used by the web layer
//! - `message`: notification event types

pub mod bus;
pub mod delivery;
pub mod domain_event_handler;
pub mod error;
pub mod manager;
pub mod message;
pub mod queue;
pub mod slot;

pub use bus::EventBus;
pub use manager::Manager;
pub use slot::{SlotIndex, UserId};
