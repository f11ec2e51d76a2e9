//! Error types for the bot.
//!
//! Each concern owns a `thiserror` enum; `AppError` aggregates the ones that can abort
//! startup or a background job. Domain errors (`RosterError`, `StickyError`) are returned
//! to command handlers as typed results and rendered for the user there.

pub mod config;
pub mod platform;
pub mod role_sync;
pub mod roster;
pub mod sticky;
pub mod store;

use thiserror::Error;

use crate::error::{config::ConfigError, store::StoreError};

/// Top-level application error type.
///
/// Aggregates the errors that can occur while starting the bot or running background
/// jobs. Most variants use `#[from]` for automatic conversion with `?`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Persistent store error that could not be absorbed by a fallback.
    #[error(transparent)]
    StoreErr(#[from] StoreError),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// Filesystem error, e.g. while creating the database directory.
    #[error(transparent)]
    IoErr(#[from] std::io::Error),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}
