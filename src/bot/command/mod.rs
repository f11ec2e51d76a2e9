//! Slash commands registered in the managed guild.
//!
//! Each command module exposes a `definition` for registration, a `parse` from the
//! resolved interaction options and an `execute` that returns a [`reply::Reply`].

use serenity::all::CreateCommand;

use crate::model::position::PositionCatalog;

pub mod options;
pub mod reply;
pub mod sticky;
pub mod structure;

/// Every slash command of the bot.
pub fn definitions(catalog: &PositionCatalog) -> Vec<CreateCommand> {
    vec![sticky::definition(), structure::definition(catalog)]
}
