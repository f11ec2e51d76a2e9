//! Ready event handler for bot initialization.
//!
//! The ready handler:
//! - Sets the bot's presence
//! - Registers the slash commands in the managed guild
//! - Validates that every sticky still has its live message

use serenity::all::{ActivityData, Context, GuildId, Ready};

use crate::{bot::command, state::BotState};

/// Handles the ready event when the bot connects to Discord.
///
/// Fires again after a reconnect, so every step here is safe to repeat.
///
/// # Arguments
/// - `state` - Services and managed guild
/// - `ctx` - Discord context for setting activity status and registering commands
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(state: &BotState, ctx: Context, ready: Ready) {
    tracing::info!("{} is connected to Discord", ready.user.name);

    ctx.set_activity(Some(ActivityData::watching("Discord Castilla")));

    let guild_id = GuildId::new(state.guild_id);
    let commands = command::definitions(state.roster.catalog());
    match guild_id.set_commands(&ctx.http, commands).await {
        Ok(registered) => tracing::info!(
            "Registered {} slash command(s) in guild {}",
            registered.len(),
            guild_id
        ),
        Err(e) => tracing::error!("Failed to register slash commands: {:?}", e),
    }

    let sticky = state.sticky.clone();
    tokio::spawn(async move {
        if let Err(e) = sticky.validate_integrity().await {
            tracing::error!("Failed to validate sticky messages: {:?}", e);
        }
    });
}
