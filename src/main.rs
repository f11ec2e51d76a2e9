mod bot;
mod config;
mod data;
mod error;
mod model;
mod scheduler;
mod service;
mod startup;
mod state;
mod util;

use std::sync::Arc;

use serenity::http::Http;

use crate::{config::Config, error::AppError, scheduler::role_reconcile};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    let http = Arc::new(Http::new(&config.discord_bot_token));
    let state = startup::build_state(&config, db, http).await?;

    // Kept alive for the lifetime of the bot.
    let _scheduler = match &config.reconcile_cron {
        Some(cron) => Some(role_reconcile::start_scheduler(cron, state.reconciler.clone()).await?),
        None => None,
    };

    bot::start::start_bot(&config, state).await
}
