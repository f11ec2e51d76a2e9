//! Domain models shared by the data, service and bot layers.
//!
//! Models are converted from SeaORM entities at the repository boundary so that
//! database-specific structures never leak into services or command handlers.

pub mod position;
pub mod role_sync;
pub mod roster;
pub mod sticky;
