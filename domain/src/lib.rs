//! Use-cases of the messaging service.
//!
//! Controllers in `web` talk to this crate only. It re-exports the entity types they need so
//! that `web` never depends on `entity_api` directly.
pub use entity_api::{messages, sessions, users, Id, PublicId};

pub mod contact;
pub mod error;
pub mod message;
pub mod user;
