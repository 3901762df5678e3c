//! SSE HTTP handler for the web layer.
//!
//! The event bus, delivery threads and notification types live in the `sse`
//! crate; this module only turns a subscription into a streaming response.

pub(crate) mod handler;
