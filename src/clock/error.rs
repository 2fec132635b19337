use thiserror::Error;

/// User-correctable problems with a clock edit. Never mutate persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name is required")]
    EmptyName,
    #[error("UTC cannot be edited")]
    ReservedName,
    #[error("A clock with that name already exists")]
    DuplicateName,
    #[error("Offset is required")]
    EmptyOffset,
    #[error("Invalid offset value")]
    InvalidOffset,
    #[error("no clock named '{0}'")]
    UnknownClock(String),
    #[error("clock '{0}' cannot be modified")]
    ImmutableClock(String),
}
