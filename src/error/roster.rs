use thiserror::Error;

use crate::error::store::StoreError;

/// Errors returned by roster operations.
///
/// Every variant is deterministic for a given roster state, so command handlers can
/// render the message directly to the user.
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Unknown position '{0}'")]
    InvalidPosition(String),

    #[error("Position {name} is full ({current}/{max})")]
    PositionFull {
        name: String,
        current: usize,
        max: usize,
    },

    #[error("Member already exists in position {0}")]
    DuplicateMember(String),

    #[error("Member '{0}' not found")]
    MemberNotFound(String),

    #[error("Source and destination positions must differ")]
    SamePosition,

    #[error("Nothing to update, provide a new name or user")]
    EmptyUpdate,

    /// Every id candidate was already taken after the bounded number of retries.
    #[error("Could not allocate a unique member id after {0} attempts")]
    IdSpaceExhausted(u32),

    #[error(transparent)]
    Store(#[from] StoreError),
}
