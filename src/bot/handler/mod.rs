use serenity::all::{
    ChannelId, Context, EventHandler, GuildChannel, GuildId, Interaction, Message, MessageId,
    Ready,
};
use serenity::async_trait;

use crate::state::BotState;

pub mod channel;
pub mod interaction;
pub mod message;
pub mod ready;

/// Discord bot event handler
pub struct Handler {
    pub state: BotState,
}

impl Handler {
    pub fn new(state: BotState) -> Self {
        Self { state }
    }

    /// Whether an event belongs to the managed guild.
    fn is_managed_guild(&self, guild_id: Option<GuildId>) -> bool {
        guild_id.is_some_and(|id| id.get() == self.state.guild_id)
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(&self.state, ctx, ready).await;
    }

    /// Called when a message is sent in a channel
    async fn message(&self, ctx: Context, message: Message) {
        if !self.is_managed_guild(message.guild_id) {
            return;
        }
        message::handle_message(&self.state, ctx, message).await;
    }

    /// Called when a single message is deleted
    async fn message_delete(
        &self,
        ctx: Context,
        channel_id: ChannelId,
        deleted_message_id: MessageId,
        guild_id: Option<GuildId>,
    ) {
        if !self.is_managed_guild(guild_id) {
            return;
        }
        message::handle_message_delete(&self.state, ctx, channel_id, vec![deleted_message_id])
            .await;
    }

    /// Called when messages are bulk deleted
    async fn message_delete_bulk(
        &self,
        ctx: Context,
        channel_id: ChannelId,
        multiple_deleted_messages_ids: Vec<MessageId>,
        guild_id: Option<GuildId>,
    ) {
        if !self.is_managed_guild(guild_id) {
            return;
        }
        message::handle_message_delete(&self.state, ctx, channel_id, multiple_deleted_messages_ids)
            .await;
    }

    /// Called when a channel is deleted from a guild
    async fn channel_delete(
        &self,
        ctx: Context,
        channel: GuildChannel,
        messages: Option<Vec<Message>>,
    ) {
        if !self.is_managed_guild(Some(channel.guild_id)) {
            return;
        }
        channel::handle_channel_delete(&self.state, ctx, channel, messages).await;
    }

    /// Called for slash commands and autocomplete requests
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        interaction::handle_interaction(&self.state, ctx, interaction).await;
    }
}
