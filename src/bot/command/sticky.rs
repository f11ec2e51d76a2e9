//! `/sticky` slash command.

use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption, Permissions, ResolvedOption};

use crate::{
    bot::command::{
        options,
        reply::{Reply, Tone},
    },
    error::sticky::StickyError,
    model::sticky::{AnchorOutcome, ChannelState, SkipReason, StickyKind, StickyStatus},
    service::sticky::{PlainStickyParam, RichStickyParam, StickyService},
};

pub const NAME: &str = "sticky";

const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone)]
pub enum StickyCommand {
    Embed(RichStickyParam),
    Plain(PlainStickyParam),
    Remove,
    Status,
    Protect(bool),
    Reset,
}

pub fn definition() -> CreateCommand {
    let image = || {
        CreateCommandOption::new(CommandOptionType::String, "image", "Image URL (http or https)")
    };

    CreateCommand::new(NAME)
        .description("Manage the sticky message of this channel")
        .default_member_permissions(Permissions::MANAGE_MESSAGES)
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "embed",
                "Set an embed sticky message",
            )
            .add_sub_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "description",
                    "Text of the embed",
                )
                .required(true),
            )
            .add_sub_option(CreateCommandOption::new(
                CommandOptionType::String,
                "title",
                "Title of the embed",
            ))
            .add_sub_option(image())
            .add_sub_option(CreateCommandOption::new(
                CommandOptionType::String,
                "color",
                "Embed colour as #RRGGBB",
            )),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "plain",
                "Set a plain text sticky message",
            )
            .add_sub_option(
                CreateCommandOption::new(CommandOptionType::String, "text", "Message text")
                    .required(true),
            )
            .add_sub_option(image()),
        )
        .add_option(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "remove",
            "Remove the sticky message",
        ))
        .add_option(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "status",
            "Show the sticky message status",
        ))
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "protect",
                "Ignore activity right after the sticky was re-sent",
            )
            .add_sub_option(
                CreateCommandOption::new(CommandOptionType::Boolean, "enabled", "Protection on/off")
                    .required(true),
            ),
        )
        .add_option(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "reset",
            "Re-enable a disabled sticky message",
        ))
}

pub fn parse(resolved: &[ResolvedOption<'_>]) -> Option<StickyCommand> {
    let (name, sub) = options::subcommand(resolved)?;

    let command = match name {
        "embed" => StickyCommand::Embed(RichStickyParam {
            title: options::text(sub, "title"),
            description: options::string(sub, "description")?.to_string(),
            image_url: options::text(sub, "image"),
            color: options::text(sub, "color"),
        }),
        "plain" => StickyCommand::Plain(PlainStickyParam {
            text: options::string(sub, "text")?.to_string(),
            image_url: options::text(sub, "image"),
        }),
        "remove" => StickyCommand::Remove,
        "status" => StickyCommand::Status,
        "protect" => StickyCommand::Protect(options::boolean(sub, "enabled")?),
        "reset" => StickyCommand::Reset,
        _ => return None,
    };

    Some(command)
}

/// Runs a `/sticky` subcommand in `channel_id` and describes the result.
pub async fn execute(
    service: &StickyService,
    channel_id: u64,
    author_id: u64,
    command: StickyCommand,
) -> Reply {
    let threshold = service.settings().error_threshold;

    let result = match command {
        StickyCommand::Embed(param) => service
            .set_rich(channel_id, Some(author_id), param)
            .await
            .map(|outcome| anchored_reply("✅ Sticky embed set", outcome, threshold)),
        StickyCommand::Plain(param) => service
            .set_plain(channel_id, Some(author_id), param)
            .await
            .map(|outcome| anchored_reply("✅ Sticky message set", outcome, threshold)),
        StickyCommand::Remove => service.remove(channel_id).await.map(|()| {
            Reply::success(
                "🗑️ Sticky message removed",
                "This channel no longer has a sticky message.",
            )
        }),
        StickyCommand::Status => service
            .status(channel_id)
            .await
            .map(|status| status_reply(&status, threshold)),
        StickyCommand::Protect(enabled) => {
            service.set_protected(channel_id, enabled).await.map(|_| {
                let description = if enabled {
                    "Activity right after the sticky is re-sent is now ignored."
                } else {
                    "Every message now re-arms the sticky."
                };
                Reply::success(
                    format!("🛡️ Protection {}", if enabled { "enabled" } else { "disabled" }),
                    description,
                )
            })
        }
        StickyCommand::Reset => service
            .reset(channel_id)
            .await
            .map(|outcome| anchored_reply("🔄 Sticky message reset", outcome, threshold)),
    };

    result.unwrap_or_else(|e| error_reply(&e))
}

fn anchored_reply(title: &str, outcome: AnchorOutcome, threshold: u32) -> Reply {
    match outcome {
        AnchorOutcome::Anchored { .. } => Reply::success(
            title,
            "The sticky message is now the last message of this channel.",
        ),
        AnchorOutcome::Failed {
            error_count,
            disabled,
        } => {
            let description = if disabled {
                "The configuration was saved but the message could not be sent, and the \
                 sticky has been disabled. Fix the bot's permissions, then use `/sticky reset`."
                    .to_string()
            } else {
                format!(
                    "The configuration was saved but the message could not be sent \
                     ({}/{} errors).",
                    error_count, threshold
                )
            };
            Reply::new(Tone::Warning, title, description)
        }
        AnchorOutcome::Skipped(SkipReason::Disabled) => Reply::new(
            Tone::Warning,
            title,
            "The sticky message is disabled; use `/sticky reset` to re-enable it.",
        ),
        AnchorOutcome::Skipped(SkipReason::NotConfigured) => {
            error_reply(&StickyError::NotConfigured)
        }
    }
}

fn status_reply(status: &StickyStatus, threshold: u32) -> Reply {
    let config = &status.config;
    let kind = match config.body.kind() {
        StickyKind::Rich => "Embed",
        StickyKind::Plain => "Plain text",
    };
    let state = match status.state {
        ChannelState::Idle => "Idle".to_string(),
        ChannelState::Pending { remaining } => {
            format!("Re-sending in {}s", remaining.as_secs())
        }
        ChannelState::Anchoring => "Re-sending now".to_string(),
        ChannelState::Disabled => "Disabled".to_string(),
    };

    Reply::info("📌 Sticky message status", "")
        .field("Type", kind, true)
        .field(
            "Status",
            if config.disabled { "🔴 Disabled" } else { "🟢 Active" },
            true,
        )
        .field(
            "Protected",
            if config.protected { "Yes" } else { "No" },
            true,
        )
        .field(
            "Errors",
            format!("{}/{}", config.error_count, threshold),
            true,
        )
        .field("Delay", format!("{}s", status.delay.as_secs()), true)
        .field("State", state, true)
        .field("Preview", config.body.preview(PREVIEW_CHARS), false)
}

fn error_reply(error: &StickyError) -> Reply {
    match error {
        StickyError::Store(e) => {
            tracing::error!("Sticky command failed: {:?}", e);
            Reply::error("Something went wrong while saving the sticky message.")
        }
        other => Reply::error(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::StickySettings, data::memory::MemoryStickyStore,
        service::fake::FakeChannelGateway,
    };

    async fn service() -> (Arc<StickyService>, Arc<FakeChannelGateway>) {
        let gateway = Arc::new(FakeChannelGateway::new());
        let service = StickyService::init(
            Arc::new(MemoryStickyStore::new()),
            gateway.clone(),
            StickySettings::default(),
        )
        .await
        .unwrap();
        (service, gateway)
    }

    #[tokio::test]
    async fn embed_then_status() {
        let (service, gateway) = service().await;

        let set = execute(
            &service,
            1,
            9,
            StickyCommand::Embed(RichStickyParam {
                description: "Rules apply".to_string(),
                ..RichStickyParam::default()
            }),
        )
        .await;
        let status = execute(&service, 1, 9, StickyCommand::Status).await;

        assert_eq!(set.tone, Tone::Success);
        assert_eq!(gateway.sent_to(1).len(), 1);
        assert!(status
            .fields
            .iter()
            .any(|(name, value, _)| name == "Type" && value == "Embed"));
        assert!(status
            .fields
            .iter()
            .any(|(name, value, _)| name == "Errors" && value == "0/5"));
    }

    #[tokio::test]
    async fn failed_send_is_reported_as_warning() {
        let (service, gateway) = service().await;
        gateway.set_fail_sends(true);

        let reply = execute(
            &service,
            1,
            9,
            StickyCommand::Plain(PlainStickyParam {
                text: "hello".to_string(),
                image_url: None,
            }),
        )
        .await;

        assert_eq!(reply.tone, Tone::Warning);
        assert!(reply.description.contains("1/5"));
    }

    #[tokio::test]
    async fn missing_sticky_is_an_error() {
        let (service, _) = service().await;

        let reply = execute(&service, 1, 9, StickyCommand::Remove).await;

        assert_eq!(reply.tone, Tone::Error);
        assert_eq!(reply.description, "There is no sticky message in this channel");
    }
}
