use std::time::Duration;

use crate::{
    error::{config::ConfigError, AppError},
    model::position::PositionCatalog,
    util::parse::{parse_hex_color, parse_u64_from_str},
};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/castilla.db?mode=rwc";
const DEFAULT_COMMAND_PREFIX: &str = "!";
const DEFAULT_STICKY_DELAY_MS: u64 = 10_000;
const DEFAULT_STICKY_ERROR_THRESHOLD: u32 = 5;
const DEFAULT_EMBED_COLOR: u32 = 0x8B4513;
const DEFAULT_ROLE_CALL_TIMEOUT_SECS: u64 = 5;

/// Tunables of the sticky re-anchor engine.
#[derive(Debug, Clone, PartialEq)]
pub struct StickySettings {
    /// Quiet period after the last qualifying message before re-anchoring.
    pub delay: Duration,
    /// Consecutive failures after which a sticky is disabled.
    pub error_threshold: u32,
    /// Recreate a sticky whose live message was deleted by someone else.
    pub restore_deleted: bool,
    /// Colour of rich stickies configured without one.
    pub embed_color: u32,
    /// Short-lived notice posted after a deleted sticky was recreated.
    pub protection_warning: Option<String>,
}

impl Default for StickySettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(DEFAULT_STICKY_DELAY_MS),
            error_threshold: DEFAULT_STICKY_ERROR_THRESHOLD,
            restore_deleted: true,
            embed_color: DEFAULT_EMBED_COLOR,
            protection_warning: None,
        }
    }
}

pub struct Config {
    pub discord_bot_token: String,
    pub guild_id: u64,
    pub database_url: String,
    pub command_prefix: String,

    pub sticky: StickySettings,

    /// Timeout applied to every role-provider call of the reconciler.
    pub role_call_timeout: Duration,
    /// Cron expression for scheduled reconciliation, disabled when unset.
    pub reconcile_cron: Option<String>,

    pub catalog: PositionCatalog,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::from_lookup(|name| std::env::var(name).ok())?)
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// # Arguments
    /// - `lookup` - Returns the raw value of a variable, `None` when unset
    ///
    /// # Returns
    /// - `Ok(Config)` - Every required variable is present and every value is valid
    /// - `Err(ConfigError)` - A required variable is missing or a value cannot be parsed
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let discord_bot_token = required(&lookup, "DISCORD_BOT_TOKEN")?;
        let guild_id = parse_id(
            "DISCORD_GUILD_ID",
            &required(&lookup, "DISCORD_GUILD_ID")?,
        )?;

        let sticky = StickySettings {
            delay: Duration::from_millis(parse_or(
                &lookup,
                "STICKY_DELAY_MS",
                DEFAULT_STICKY_DELAY_MS,
            )?),
            error_threshold: parse_or(
                &lookup,
                "STICKY_ERROR_THRESHOLD",
                DEFAULT_STICKY_ERROR_THRESHOLD,
            )?
            .max(1),
            restore_deleted: parse_or(&lookup, "STICKY_RESTORE_DELETED", true)?,
            embed_color: match optional(&lookup, "EMBED_COLOR") {
                Some(value) => parse_hex_color(&value)
                    .ok_or_else(|| invalid("EMBED_COLOR", &value, "expected #RRGGBB"))?,
                None => DEFAULT_EMBED_COLOR,
            },
            protection_warning: optional(&lookup, "STICKY_PROTECTION_WARNING"),
        };

        let mut catalog = PositionCatalog::default();
        let keys: Vec<String> = catalog.positions().iter().map(|p| p.key.clone()).collect();
        for key in keys {
            let upper = key.to_uppercase();
            let role_var = format!("POSITION_ROLE_{}", upper);
            let role_id = optional(&lookup, &role_var)
                .map(|value| parse_id(&role_var, &value))
                .transpose()?;
            let capacity_var = format!("POSITION_CAPACITY_{}", upper);
            let capacity = optional(&lookup, &capacity_var)
                .map(|value| {
                    value
                        .parse::<usize>()
                        .map_err(|e| invalid(&capacity_var, &value, &e.to_string()))
                })
                .transpose()?;

            if let Some(spec) = catalog.get_mut(&key) {
                if role_id.is_some() {
                    spec.role_id = role_id;
                }
                if let Some(capacity) = capacity {
                    spec.max_members = capacity;
                }
            }
        }

        Ok(Self {
            discord_bot_token,
            guild_id,
            database_url: optional(&lookup, "DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            command_prefix: optional(&lookup, "COMMAND_PREFIX")
                .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string()),
            sticky,
            role_call_timeout: Duration::from_secs(parse_or(
                &lookup,
                "ROLE_CALL_TIMEOUT_SECS",
                DEFAULT_ROLE_CALL_TIMEOUT_SECS,
            )?),
            reconcile_cron: optional(&lookup, "ROLE_RECONCILE_CRON"),
            catalog,
        })
    }
}

/// Value of a variable, treating blank values as unset.
fn optional(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String, ConfigError> {
    optional(lookup, name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match optional(lookup, name) {
        Some(value) => value
            .parse::<T>()
            .map_err(|e| invalid(name, &value, &e.to_string())),
        None => Ok(default),
    }
}

fn parse_id(name: &str, value: &str) -> Result<u64, ConfigError> {
    parse_u64_from_str(value).ok_or_else(|| invalid(name, value, "expected a Discord id"))
}

fn invalid(name: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidEnvVar {
        name: name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
