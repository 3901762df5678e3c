use uuid::Uuid;

pub mod messages;
pub mod sessions;
pub mod users;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = i32;

/// Public identifier handed out to clients in place of the internal id.
pub type PublicId = Uuid;
