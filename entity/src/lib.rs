//! SeaORM entities for the bot's SQLite store.

pub mod prelude;

pub mod roster_member;
pub mod roster_metadata;
pub mod sticky_message;
