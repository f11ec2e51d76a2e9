//! Domain models for sticky messages.
//!
//! A sticky is a message the bot keeps as the most recent message of a channel by
//! deleting and re-sending it after chat activity settles down.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::store::StoreError;

/// Colour used for rich stickies stored without one.
pub const DEFAULT_STICKY_COLOR: u32 = 0x8B4513;

/// Title used when a rich sticky is stored without one.
pub const DEFAULT_STICKY_TITLE: &str = "📌 Sticky Message";

/// How a sticky is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StickyKind {
    Rich,
    Plain,
}

impl StickyKind {
    /// Storage representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            StickyKind::Rich => "embed",
            StickyKind::Plain => "plain",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "embed" => Some(StickyKind::Rich),
            "plain" => Some(StickyKind::Plain),
            _ => None,
        }
    }
}

/// Content of a sticky message.
#[derive(Debug, Clone, PartialEq)]
pub enum StickyBody {
    /// Rendered as an embed.
    Rich {
        title: String,
        description: String,
        image_url: Option<String>,
        color: u32,
    },
    /// Rendered as plain message content.
    Plain {
        text: String,
        image_url: Option<String>,
    },
}

impl StickyBody {
    pub fn kind(&self) -> StickyKind {
        match self {
            StickyBody::Rich { .. } => StickyKind::Rich,
            StickyBody::Plain { .. } => StickyKind::Plain,
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        match self {
            StickyBody::Rich { image_url, .. } | StickyBody::Plain { image_url, .. } => {
                image_url.as_deref()
            }
        }
    }

    /// Main text of the sticky, the embed description or the plain content.
    pub fn text(&self) -> &str {
        match self {
            StickyBody::Rich { description, .. } => description,
            StickyBody::Plain { text, .. } => text,
        }
    }

    /// First `max_chars` characters of the text, with an ellipsis when truncated.
    pub fn preview(&self, max_chars: usize) -> String {
        let text = self.text();
        if text.chars().count() <= max_chars {
            return text.to_string();
        }
        let mut preview: String = text.chars().take(max_chars).collect();
        preview.push_str("...");
        preview
    }
}

/// Sticky configuration of one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct StickyConfig {
    pub channel_id: u64,
    /// Message id of the live rendering, if one has been sent.
    pub message_id: Option<u64>,
    pub body: StickyBody,
    /// While set, activity within one delay of the last re-anchor is ignored.
    pub protected: bool,
    /// Set once the error threshold is reached; cleared only by a reset.
    pub disabled: bool,
    /// Consecutive failed re-anchors.
    pub error_count: u32,
    /// User who configured the sticky.
    pub author_id: Option<u64>,
    pub created_at: DateTime<Utc>,
    /// Time of the last configuration change or successful re-anchor.
    pub last_updated: DateTime<Utc>,
}

impl StickyConfig {
    /// Creates a fresh, active configuration without a live rendering.
    pub fn new(
        channel_id: u64,
        body: StickyBody,
        author_id: Option<u64>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            channel_id,
            message_id: None,
            body,
            protected: false,
            disabled: false,
            error_count: 0,
            author_id,
            created_at: now,
            last_updated: now,
        }
    }

    /// Converts an entity model to a sticky configuration at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(StickyConfig)` - The converted configuration
    /// - `Err(StoreError::Corrupt)` - An id, the kind or the error count cannot be interpreted
    pub fn from_entity(entity: entity::sticky_message::Model) -> Result<Self, StoreError> {
        let channel_id = parse_id(&entity.channel_id, "channel_id")?;
        let message_id = entity
            .message_id
            .as_deref()
            .map(|id| parse_id(id, "message_id"))
            .transpose()?;
        let author_id = entity
            .author_id
            .as_deref()
            .map(|id| parse_id(id, "author_id"))
            .transpose()?;

        let kind = StickyKind::parse(&entity.kind).ok_or_else(|| {
            StoreError::corrupt("sticky", format!("unknown sticky kind '{}'", entity.kind))
        })?;
        let body = match kind {
            StickyKind::Rich => StickyBody::Rich {
                title: entity
                    .title
                    .unwrap_or_else(|| DEFAULT_STICKY_TITLE.to_string()),
                description: entity.content,
                image_url: entity.image_url,
                color: match entity.color {
                    Some(color) => u32::try_from(color).map_err(|_| {
                        StoreError::corrupt("sticky", format!("invalid color {}", color))
                    })?,
                    None => DEFAULT_STICKY_COLOR,
                },
            },
            StickyKind::Plain => StickyBody::Plain {
                text: entity.content,
                image_url: entity.image_url,
            },
        };

        let error_count = u32::try_from(entity.error_count).map_err(|_| {
            StoreError::corrupt(
                "sticky",
                format!("negative error count {}", entity.error_count),
            )
        })?;

        Ok(Self {
            channel_id,
            message_id,
            body,
            protected: entity.protected,
            disabled: entity.disabled,
            error_count,
            author_id,
            created_at: entity.created_at,
            last_updated: entity.last_updated,
        })
    }
}

fn parse_id(value: &str, field: &str) -> Result<u64, StoreError> {
    value
        .parse::<u64>()
        .map_err(|_| StoreError::corrupt("sticky", format!("invalid {} '{}'", field, value)))
}

/// Every sticky configuration, keyed by channel id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StickySnapshot {
    pub channels: BTreeMap<u64, StickyConfig>,
}

impl StickySnapshot {
    pub fn get(&self, channel_id: u64) -> Option<&StickyConfig> {
        self.channels.get(&channel_id)
    }

    pub fn get_mut(&mut self, channel_id: u64) -> Option<&mut StickyConfig> {
        self.channels.get_mut(&channel_id)
    }

    /// Inserts or replaces the configuration of its channel.
    pub fn insert(&mut self, config: StickyConfig) {
        self.channels.insert(config.channel_id, config);
    }

    pub fn remove(&mut self, channel_id: u64) -> Option<StickyConfig> {
        self.channels.remove(&channel_id)
    }
}

/// Chat activity observed in a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityEvent {
    pub channel_id: u64,
    pub author_id: u64,
    /// Bot, webhook or system author.
    pub is_system_actor: bool,
    /// Message is a prefix command addressed to this bot.
    pub is_command: bool,
}

/// Why an activity event did not arm a re-anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    SystemActor,
    Command,
    NotConfigured,
    Disabled,
    /// Protected sticky that was re-anchored less than one delay ago.
    Protected,
}

/// Result of feeding an activity event to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityOutcome {
    /// A re-anchor is scheduled at `deadline`, replacing any earlier one.
    Armed { deadline: tokio::time::Instant },
    Ignored(IgnoreReason),
}

/// Why an anchor attempt did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotConfigured,
    Disabled,
}

/// Result of one re-anchor attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorOutcome {
    /// The sticky was re-sent and is now message `message_id`.
    Anchored { message_id: u64 },
    /// Sending failed; `disabled` is set once the error threshold is reached.
    Failed { error_count: u32, disabled: bool },
    Skipped(SkipReason),
}

/// Runtime state of a channel in the re-anchor engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Idle,
    /// A re-anchor is scheduled to fire in `remaining`.
    Pending { remaining: Duration },
    Anchoring,
    Disabled,
}

/// Read-only view of a channel's sticky for the status command.
#[derive(Debug, Clone, PartialEq)]
pub struct StickyStatus {
    pub config: StickyConfig,
    pub state: ChannelState,
    /// Debounce delay in effect.
    pub delay: Duration,
}

/// Counters of a startup integrity validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    /// Active stickies that were inspected.
    pub checked: usize,
    /// Stickies whose live rendering was missing and that were re-anchored.
    pub repaired: usize,
    /// Configurations dropped because their channel no longer exists.
    pub removed: usize,
}
