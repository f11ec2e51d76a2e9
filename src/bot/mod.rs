//! Discord bot integration.
//!
//! Translates gateway events into calls on the sticky engine and the roster services,
//! and registers the `/sticky` and `/ms` slash commands in the managed guild.
//!
//! # Gateway Intents
//!
//! The bot requires the following gateway intents:
//! - `GUILDS` - Channel deletion events
//! - `GUILD_MESSAGES` - Chat activity and message deletions
//! - `MESSAGE_CONTENT` - Recognising prefix commands (privileged intent)
//! - `GUILD_MEMBERS` - Listing role holders during reconciliation (privileged intent)
//!
//! Privileged intents must be enabled in the Discord Developer Portal for the bot
//! application.

pub mod command;
pub mod gateway;
pub mod handler;
pub mod render;
pub mod start;
