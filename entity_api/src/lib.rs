pub use entity::{messages, sessions, users, Id, PublicId};

pub mod error;
pub mod message;
pub mod session;
pub mod user;

/// Parses a client-supplied public identifier.
pub fn uuid_parse_str(uuid_str: &str) -> Result<PublicId, error::Error> {
    PublicId::parse_str(uuid_str).map_err(|_| error::Error {
        source: None,
        error_kind: error::EntityApiErrorKind::InvalidQueryTerm,
    })
}
