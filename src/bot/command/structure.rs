//! `/ms` slash command managing the family structure.

use serenity::all::{
    CommandOptionType, CreateCommand, CreateCommandOption, Permissions, ResolvedOption,
};

use crate::{
    bot::command::{
        options,
        reply::{Reply, Tone},
    },
    error::{role_sync::RoleSyncError, roster::RosterError},
    model::{
        position::PositionCatalog,
        roster::{Member, NewMemberParam, Position, UpdateMemberParam},
    },
    service::{role_sync::RoleReconciler, roster::RosterService},
};

pub const NAME: &str = "ms";

/// Hits shown by `/ms search`.
const MAX_SEARCH_RESULTS: usize = 10;

#[derive(Debug, Clone)]
pub enum RosterCommand {
    Add {
        position: String,
        param: NewMemberParam,
    },
    Remove {
        position: String,
        id: String,
    },
    Update {
        position: String,
        id: String,
        param: UpdateMemberParam,
    },
    Move {
        from: String,
        to: String,
        id: String,
    },
    Search(String),
    Stats,
    List(String),
    All,
    Sync,
}

impl RosterCommand {
    /// Read-only views are answered publicly, mutations ephemerally.
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Self::Search(_) | Self::Stats | Self::List(_) | Self::All
        )
    }
}

fn position_option(
    catalog: &PositionCatalog,
    name: &str,
    description: &str,
) -> CreateCommandOption {
    catalog.positions().iter().fold(
        CreateCommandOption::new(CommandOptionType::String, name, description).required(true),
        |option, spec| option.add_string_choice(&spec.name, &spec.key),
    )
}

fn member_option() -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::String, "id", "Member id")
        .required(true)
        .set_autocomplete(true)
}

fn subcommand(name: &str, description: &str) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::SubCommand, name, description)
}

pub fn definition(catalog: &PositionCatalog) -> CreateCommand {
    CreateCommand::new(NAME)
        .description("Manage the structure of the family")
        .default_member_permissions(Permissions::MANAGE_ROLES)
        .add_option(
            subcommand("add", "Add a member to a position")
                .add_sub_option(position_option(catalog, "position", "Position"))
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::String, "name", "Member name")
                        .required(true),
                )
                .add_sub_option(CreateCommandOption::new(
                    CommandOptionType::User,
                    "user",
                    "Discord user to link",
                ))
                .add_sub_option(CreateCommandOption::new(
                    CommandOptionType::String,
                    "id",
                    "Member id, generated when omitted",
                )),
        )
        .add_option(
            subcommand("remove", "Remove a member")
                .add_sub_option(position_option(catalog, "position", "Position"))
                .add_sub_option(member_option()),
        )
        .add_option(
            subcommand("update", "Rename a member or change the linked user")
                .add_sub_option(position_option(catalog, "position", "Position"))
                .add_sub_option(member_option())
                .add_sub_option(CreateCommandOption::new(
                    CommandOptionType::String,
                    "name",
                    "New name",
                ))
                .add_sub_option(CreateCommandOption::new(
                    CommandOptionType::User,
                    "user",
                    "New Discord user",
                ))
                .add_sub_option(CreateCommandOption::new(
                    CommandOptionType::Boolean,
                    "unlink",
                    "Remove the linked Discord user",
                )),
        )
        .add_option(
            subcommand("move", "Move a member to another position")
                .add_sub_option(position_option(catalog, "from", "Current position"))
                .add_sub_option(position_option(catalog, "to", "New position"))
                .add_sub_option(member_option()),
        )
        .add_option(
            subcommand("search", "Search members by name or id").add_sub_option(
                CreateCommandOption::new(CommandOptionType::String, "query", "Name or id")
                    .required(true),
            ),
        )
        .add_option(subcommand("stats", "Show position occupancy"))
        .add_option(
            subcommand("list", "List the members of a position")
                .add_sub_option(position_option(catalog, "position", "Position")),
        )
        .add_option(subcommand("all", "Show the whole structure"))
        .add_option(subcommand(
            "sync",
            "Reconcile Discord roles with the structure",
        ))
}

pub fn parse(resolved: &[ResolvedOption<'_>]) -> Option<RosterCommand> {
    let (name, sub) = options::subcommand(resolved)?;
    let position = || options::string(sub, "position").map(str::to_string);
    let id = || options::text(sub, "id");

    let command = match name {
        "add" => RosterCommand::Add {
            position: position()?,
            param: NewMemberParam {
                id: id(),
                name: options::text(sub, "name")?,
                user_id: options::user(sub, "user"),
            },
        },
        "remove" => RosterCommand::Remove {
            position: position()?,
            id: id()?,
        },
        "update" => {
            let user_id = if options::boolean(sub, "unlink").unwrap_or(false) {
                Some(None)
            } else {
                options::user(sub, "user").map(Some)
            };
            RosterCommand::Update {
                position: position()?,
                id: id()?,
                param: UpdateMemberParam {
                    name: options::text(sub, "name"),
                    user_id,
                },
            }
        }
        "move" => RosterCommand::Move {
            from: options::string(sub, "from")?.to_string(),
            to: options::string(sub, "to")?.to_string(),
            id: id()?,
        },
        "search" => RosterCommand::Search(options::string(sub, "query")?.to_string()),
        "stats" => RosterCommand::Stats,
        "list" => RosterCommand::List(position()?),
        "all" => RosterCommand::All,
        "sync" => RosterCommand::Sync,
        _ => return None,
    };

    Some(command)
}

/// Runs a `/ms` subcommand and describes the result.
pub async fn execute(
    roster: &RosterService,
    reconciler: &RoleReconciler,
    author_id: u64,
    command: RosterCommand,
) -> Reply {
    let catalog = roster.catalog();
    let position_name = |key: &str| {
        catalog
            .get(key)
            .map(|spec| spec.name.clone())
            .unwrap_or_else(|| key.to_string())
    };

    let result = match command {
        RosterCommand::Add { position, param } => roster
            .add_member(&position, param, Some(author_id))
            .await
            .map(|member| {
                member_reply("✅ Member added", &member)
                    .field("Position", position_name(&position), true)
            }),
        RosterCommand::Remove { position, id } => roster
            .remove_member(&position, &id)
            .await
            .map(|member| {
                member_reply("🗑️ Member removed", &member)
                    .field("Position", position_name(&position), true)
            }),
        RosterCommand::Update {
            position,
            id,
            param,
        } => roster
            .update_member(&position, &id, param)
            .await
            .map(|member| member_reply("✏️ Member updated", &member)),
        RosterCommand::Move { from, to, id } => roster
            .move_member(&from, &to, &id)
            .await
            .map(|member| {
                member_reply("🔀 Member moved", &member).field(
                    "Move",
                    format!("{} → {}", position_name(&from), position_name(&to)),
                    false,
                )
            }),
        RosterCommand::Search(query) => roster.search(&query).await.map(|hits| {
            if hits.is_empty() {
                return Reply::info(
                    "🔍 Search",
                    format!("No member matches \"{}\".", query.trim()),
                );
            }
            let lines = hits
                .iter()
                .take(MAX_SEARCH_RESULTS)
                .map(|hit| format!("{} · {}", member_line(&hit.member), hit.position_name))
                .collect::<Vec<_>>();
            let mut description = lines.join("\n");
            if hits.len() > MAX_SEARCH_RESULTS {
                description.push_str(&format!(
                    "\n… and {} more",
                    hits.len() - MAX_SEARCH_RESULTS
                ));
            }
            Reply::info(format!("🔍 Search: {} result(s)", hits.len()), description)
        }),
        RosterCommand::Stats => roster.stats().await.map(|stats| {
            stats.positions.iter().fold(
                Reply::info(
                    "📊 Structure statistics",
                    format!("Total members: **{}**", stats.total_members),
                ),
                |reply, position| {
                    reply.field(
                        &position.name,
                        format!(
                            "{}/{} ({}%)",
                            position.current, position.max, position.percentage
                        ),
                        true,
                    )
                },
            )
        }),
        RosterCommand::List(key) => roster.list(&key).await.map(|position| {
            Reply::info(
                format!(
                    "{} ({}/{})",
                    position.name,
                    position.members.len(),
                    position.max_members
                ),
                members_block(&position),
            )
        }),
        RosterCommand::All => roster.snapshot().await.map(|snapshot| {
            snapshot.positions.iter().fold(
                Reply::info(
                    "🏛️ Family structure",
                    format!("Total members: **{}**", snapshot.metadata.total_members),
                ),
                |reply, position| {
                    reply.field(
                        format!(
                            "{} ({}/{})",
                            position.name,
                            position.members.len(),
                            position.max_members
                        ),
                        members_block(position),
                        false,
                    )
                },
            )
        }),
        RosterCommand::Sync => {
            return match reconciler.reconcile_all().await {
                Ok(report) => {
                    let tone = if report.errored > 0 {
                        Tone::Warning
                    } else {
                        Tone::Success
                    };
                    Reply::new(tone, "🔄 Roles synchronised", "")
                        .field("Checked", report.checked.to_string(), true)
                        .field("Fixed", report.fixed.to_string(), true)
                        .field("Errors", report.errored.to_string(), true)
                        .field("Removed", report.removed.to_string(), true)
                }
                Err(e) => sync_error_reply(&e),
            };
        }
    };

    result.unwrap_or_else(|e| error_reply(&e))
}

fn member_line(member: &Member) -> String {
    match member.user_id {
        Some(user_id) => format!("**{}** (`{}`) <@{}>", member.name, member.id, user_id),
        None => format!("**{}** (`{}`)", member.name, member.id),
    }
}

fn member_reply(title: &str, member: &Member) -> Reply {
    Reply::success(title, member_line(member))
}

fn members_block(position: &Position) -> String {
    if position.members.is_empty() {
        return "*No members*".to_string();
    }
    position
        .members
        .iter()
        .map(member_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn error_reply(error: &RosterError) -> Reply {
    match error {
        RosterError::Store(e) => {
            tracing::error!("Roster command failed: {:?}", e);
            Reply::error("Something went wrong while saving the structure.")
        }
        other => Reply::error(other.to_string()),
    }
}

fn sync_error_reply(error: &RoleSyncError) -> Reply {
    tracing::error!("Role reconciliation failed: {:?}", error);
    Reply::error("Role synchronisation could not be completed.")
}
