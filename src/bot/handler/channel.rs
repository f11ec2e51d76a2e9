use serenity::all::{Context, GuildChannel, Message};

use crate::state::BotState;

/// Handles the channel_delete event when a channel is deleted from a guild.
///
/// Drops the channel's sticky configuration so it is not re-anchored into a channel that
/// no longer exists.
pub async fn handle_channel_delete(
    state: &BotState,
    _ctx: Context,
    channel: GuildChannel,
    _messages: Option<Vec<Message>>,
) {
    match state.sticky.forget_channel(channel.id.get()).await {
        Ok(true) => tracing::info!(
            "Removed sticky message of deleted channel {} ({})",
            channel.name,
            channel.id
        ),
        Ok(false) => {}
        Err(e) => tracing::error!(
            "Failed to remove sticky message of deleted channel {}: {:?}",
            channel.id,
            e
        ),
    }
}
