use thiserror::Error;

/// Failures reported by the chat-platform collaborators.
///
/// All send failures count the same towards a sticky's error count; `NotFound` on delete
/// is an expected outcome rather than a failure.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The referenced message or member does not exist (anymore).
    #[error("Resource not found")]
    NotFound,

    /// The channel itself does not exist or is not visible to the bot.
    #[error("Unknown channel {0}")]
    UnknownChannel(u64),

    /// Sending a message failed, e.g. missing permission.
    #[error("Failed to send message to channel {channel_id}: {reason}")]
    Send { channel_id: u64, reason: String },

    /// Granting or revoking a role failed.
    #[error("Failed to {action} role {role_id} for user {user_id}: {reason}")]
    RoleOp {
        action: &'static str,
        user_id: u64,
        role_id: u64,
        reason: String,
    },

    /// Looking up a member or role holders failed.
    #[error("Lookup failed: {0}")]
    Lookup(String),

    /// The call did not complete within the configured timeout.
    #[error("Call timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Any other Discord API failure.
    #[error(transparent)]
    Discord(#[from] Box<serenity::Error>),
}

impl From<serenity::Error> for PlatformError {
    fn from(err: serenity::Error) -> Self {
        PlatformError::Discord(Box::new(err))
    }
}
