use serenity::all::{ChannelId, Context, Message, MessageId, MessageType};

use crate::{model::sticky::ActivityEvent, state::BotState};

/// Builds the engine's view of a chat message.
///
/// Bots, webhooks and system messages count as system actors; messages starting with
/// the command prefix are commands.
pub fn activity_from_message(message: &Message, command_prefix: &str) -> ActivityEvent {
    let is_system_actor = message.author.bot
        || message.author.system
        || message.webhook_id.is_some()
        || !matches!(message.kind, MessageType::Regular | MessageType::InlineReply);

    ActivityEvent {
        channel_id: message.channel_id.get(),
        author_id: message.author.id.get(),
        is_system_actor,
        is_command: message.content.trim_start().starts_with(command_prefix),
    }
}

/// Handle message creation in a channel
pub async fn handle_message(state: &BotState, _ctx: Context, message: Message) {
    let event = activity_from_message(&message, &state.command_prefix);
    let outcome = state.sticky.handle_activity(event).await;

    tracing::trace!(
        "Activity in channel {}: {:?}",
        message.channel_id,
        outcome
    );
}

/// Handle deletion of one or more messages in a channel
///
/// Recreates the channel's sticky if its live message was among them.
pub async fn handle_message_delete(
    state: &BotState,
    _ctx: Context,
    channel_id: ChannelId,
    message_ids: Vec<MessageId>,
) {
    for message_id in message_ids {
        match state
            .sticky
            .restore_deleted(channel_id.get(), message_id.get())
            .await
        {
            Ok(Some(outcome)) => {
                tracing::info!(
                    "Restored deleted sticky in channel {}: {:?}",
                    channel_id,
                    outcome
                );
                // At most one live sticky per channel.
                break;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(
                    "Failed to restore sticky in channel {}: {:?}",
                    channel_id,
                    e
                );
            }
        }
    }
}
