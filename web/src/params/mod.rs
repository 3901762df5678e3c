//! Typed inputs for the JSON endpoints.
//!
//! Deserializing into these structs validates shape and types before any
//! handler logic runs; axum rejects malformed bodies and query strings itself.

pub(crate) mod message;
pub(crate) mod user;
