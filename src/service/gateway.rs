//! Chat-platform collaborators used by the services.
//!
//! The services never talk to Discord directly; they go through these traits so the
//! engine and reconciler can be exercised with in-memory fakes.

use crate::{error::platform::PlatformError, model::sticky::StickyBody};

/// Sends and deletes messages in guild channels.
#[serenity::async_trait]
pub trait ChannelGateway: Send + Sync {
    /// Sends a rendering of `body` and returns the new message id.
    async fn send_message(&self, channel_id: u64, body: &StickyBody) -> Result<u64, PlatformError>;

    /// Deletes a message; `Err(PlatformError::NotFound)` when it is already gone.
    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), PlatformError>;

    /// Whether the message still exists.
    ///
    /// Returns `Err(PlatformError::UnknownChannel)` when the channel itself is gone.
    async fn message_exists(&self, channel_id: u64, message_id: u64)
        -> Result<bool, PlatformError>;
}

/// Reads and changes role assignments in the managed guild.
#[serenity::async_trait]
pub trait RoleGateway: Send + Sync {
    /// Roles currently held by the user, `None` when the user is not in the guild.
    async fn member_roles(&self, user_id: u64) -> Result<Option<Vec<u64>>, PlatformError>;

    async fn grant_role(&self, user_id: u64, role_id: u64) -> Result<(), PlatformError>;

    async fn revoke_role(&self, user_id: u64, role_id: u64) -> Result<(), PlatformError>;

    /// Every guild member currently holding the role.
    async fn role_holders(&self, role_id: u64) -> Result<Vec<u64>, PlatformError>;
}
