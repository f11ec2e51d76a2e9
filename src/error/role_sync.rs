use thiserror::Error;

use crate::error::{platform::PlatformError, store::StoreError};

/// Errors that prevent a role sync from being attempted at all.
///
/// Individual grant/revoke failures are not errors; they are counted in `SyncReport`.
#[derive(Error, Debug)]
pub enum RoleSyncError {
    #[error("Unknown position '{0}'")]
    UnknownPosition(String),

    #[error("User {0} is not a member of the guild")]
    NotInGuild(u64),

    #[error("Failed to look up roles of user {user_id}: {source}")]
    Lookup {
        user_id: u64,
        #[source]
        source: PlatformError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}
