//! Error types for the `sse` crate.
//!
//! Follows the same pattern as `domain::error`: a root `Error` struct carrying an
//! `error_kind` and an optional `source` for chaining.

use std::error::Error as StdError;
use std::fmt;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// Growing the slot table or a slot's queue failed.
    Allocation,
    /// The slot index is out of range or the slot is not connected.
    InvalidSlot,
    /// The slot was disconnected while a consumer was waiting on it.
    Disconnected,
    /// The subscriber's transport refused the write.
    Transport,
    /// An event could not be serialized.
    Serialization,
    /// The delivery thread could not be started.
    Spawn,
}

impl Error {
    pub(crate) fn new(error_kind: ErrorKind) -> Self {
        Self {
            source: None,
            error_kind,
        }
    }

    pub(crate) fn with_source<E>(error_kind: ErrorKind, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            source: Some(Box::new(source)),
            error_kind,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "SSE Error: {:?}: {source}", self.error_kind),
            None => write!(f, "SSE Error: {:?}", self.error_kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(err: std::collections::TryReserveError) -> Self {
        Error::with_source(ErrorKind::Allocation, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Serialization, err)
    }
}
