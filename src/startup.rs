use std::{path::Path, sync::Arc};

use sea_orm::DatabaseConnection;
use serenity::http::Http;
use tracing_subscriber::EnvFilter;

use crate::{
    bot::gateway::DiscordGateway,
    config::Config,
    data::{roster::RosterRepository, sticky::StickyRepository},
    error::AppError,
    service::{role_sync::RoleReconciler, roster::RosterService, sticky::StickyService},
    state::BotState,
};

/// Installs the global tracing subscriber.
///
/// The filter is read from `RUST_LOG` and defaults to info-level logs for this crate.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "castilla_bot=info,serenity=warn".into()),
        )
        .init();
}

/// Connects to the Sqlite database and runs pending migrations.
///
/// For a file database the parent directory is created first, so a fresh checkout can
/// start with the default `sqlite://data/castilla.db?mode=rwc` URL.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError)` - Failed to create the directory, connect or migrate
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    if let Some(dir) = sqlite_parent_dir(&config.database_url) {
        std::fs::create_dir_all(dir)?;
    }

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Directory holding the database file of a `sqlite://` URL, if it has one.
fn sqlite_parent_dir(database_url: &str) -> Option<&Path> {
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next()?;
    if path.is_empty() || path.starts_with(':') {
        return None;
    }
    Path::new(path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
}

/// Wires stores, gateways and services together.
///
/// # Returns
/// - `Ok(BotState)` - Services ready to be handed to the event handler
/// - `Err(AppError)` - The sticky store could not be loaded
pub async fn build_state(
    config: &Config,
    db: DatabaseConnection,
    http: Arc<Http>,
) -> Result<BotState, AppError> {
    let gateway = Arc::new(DiscordGateway::new(http, config.guild_id));
    let sticky_store = Arc::new(StickyRepository::new(db.clone()));
    let roster_store = Arc::new(RosterRepository::new(db, config.catalog.clone()));

    let sticky = StickyService::init(sticky_store, gateway.clone(), config.sticky.clone()).await?;

    let reconciler = Arc::new(RoleReconciler::new(
        gateway,
        roster_store.clone(),
        config.catalog.clone(),
        config.role_call_timeout,
    ));

    let roster = Arc::new(
        RosterService::new(roster_store, config.catalog.clone())
            .with_reconciler(reconciler.clone()),
    );

    Ok(BotState::new(
        config.guild_id,
        config.command_prefix.clone(),
        sticky,
        roster,
        reconciler,
    ))
}
