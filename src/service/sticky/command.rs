use chrono::Utc;
use tokio::time::Instant;

use crate::{
    error::{platform::PlatformError, sticky::StickyError, store::StoreError},
    model::sticky::{
        AnchorOutcome, ChannelState, StickyBody, StickyConfig, StickyStatus, DEFAULT_STICKY_TITLE,
    },
    service::sticky::StickyService,
    util::parse::{is_valid_image_url, parse_hex_color},
};

/// Parameters for configuring a rich (embed) sticky.
#[derive(Debug, Clone, Default)]
pub struct RichStickyParam {
    pub title: Option<String>,
    pub description: String,
    pub image_url: Option<String>,
    /// `#RRGGBB`; the configured embed colour when absent.
    pub color: Option<String>,
}

/// Parameters for configuring a plain-text sticky.
#[derive(Debug, Clone, Default)]
pub struct PlainStickyParam {
    pub text: String,
    pub image_url: Option<String>,
}

fn validate_image(image_url: Option<String>) -> Result<Option<String>, StickyError> {
    match image_url.map(|url| url.trim().to_string()) {
        Some(url) if url.is_empty() => Ok(None),
        Some(url) if is_valid_image_url(&url) => Ok(Some(url)),
        Some(url) => Err(StickyError::InvalidImageUrl(url)),
        None => Ok(None),
    }
}

fn validate_text(text: String) -> Result<String, StickyError> {
    if text.trim().is_empty() {
        return Err(StickyError::EmptyContent);
    }
    Ok(text)
}

impl StickyService {
    /// Configures a rich sticky for the channel, replacing any existing one, and anchors it.
    ///
    /// # Returns
    /// - `Ok(AnchorOutcome)` - Configuration saved; outcome of the immediate anchor
    /// - `Err(StickyError::EmptyContent)` - Description is blank
    /// - `Err(StickyError::InvalidImageUrl)` - Image is not an http(s) URL
    /// - `Err(StickyError::InvalidColor)` - Colour is not `#RRGGBB`
    /// - `Err(StickyError::Store)` - Configuration could not be saved
    pub async fn set_rich(
        &self,
        channel_id: u64,
        author_id: Option<u64>,
        param: RichStickyParam,
    ) -> Result<AnchorOutcome, StickyError> {
        let color = match param.color {
            Some(raw) => parse_hex_color(&raw).ok_or(StickyError::InvalidColor(raw))?,
            None => self.settings.embed_color,
        };
        let title = param
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_STICKY_TITLE.to_string());

        let body = StickyBody::Rich {
            title,
            description: validate_text(param.description)?,
            image_url: validate_image(param.image_url)?,
            color,
        };

        self.replace_config(channel_id, author_id, body).await
    }

    /// Configures a plain-text sticky for the channel, replacing any existing one, and
    /// anchors it.
    pub async fn set_plain(
        &self,
        channel_id: u64,
        author_id: Option<u64>,
        param: PlainStickyParam,
    ) -> Result<AnchorOutcome, StickyError> {
        let body = StickyBody::Plain {
            text: validate_text(param.text)?,
            image_url: validate_image(param.image_url)?,
        };

        self.replace_config(channel_id, author_id, body).await
    }

    async fn replace_config(
        &self,
        channel_id: u64,
        author_id: Option<u64>,
        body: StickyBody,
    ) -> Result<AnchorOutcome, StickyError> {
        let lock = self.anchor_lock(channel_id).await;
        let _guard = lock.lock().await;

        self.cancel_pending(channel_id).await;

        let now = Utc::now();
        self.persist(|snapshot| {
            let mut config = StickyConfig::new(channel_id, body, author_id, now);
            // Keep the old rendering's id so the anchor below deletes it.
            config.message_id = snapshot.get(channel_id).and_then(|c| c.message_id);
            snapshot.insert(config);
        })
        .await?;

        tracing::info!("Sticky message configured for channel {}", channel_id);

        Ok(self.anchor_locked(channel_id).await?)
    }

    /// Removes the channel's sticky and deletes its live rendering.
    ///
    /// # Returns
    /// - `Ok(())` - Configuration dropped; the rendering was deleted or already gone
    /// - `Err(StickyError::NotConfigured)` - The channel has no sticky
    /// - `Err(StickyError::Store)` - The removal could not be saved
    pub async fn remove(&self, channel_id: u64) -> Result<(), StickyError> {
        let lock = self.anchor_lock(channel_id).await;
        let _guard = lock.lock().await;

        self.cancel_pending(channel_id).await;

        let removed = self
            .persist(|snapshot| snapshot.remove(channel_id))
            .await?
            .ok_or(StickyError::NotConfigured)?;

        if let Some(message_id) = removed.message_id {
            match self.gateway.delete_message(channel_id, message_id).await {
                Ok(()) | Err(PlatformError::NotFound) => {}
                Err(e) => tracing::warn!(
                    "Failed to delete sticky message {} in channel {}: {}",
                    message_id,
                    channel_id,
                    e
                ),
            }
        }

        self.clear_slot(channel_id).await;

        tracing::info!("Sticky message removed from channel {}", channel_id);

        Ok(())
    }

    /// Read-only view of the channel's sticky and its engine state.
    pub async fn status(&self, channel_id: u64) -> Result<StickyStatus, StickyError> {
        let config = self
            .config(channel_id)
            .await
            .ok_or(StickyError::NotConfigured)?;

        let channels = self.channels.lock().await;
        let slot = channels.get(&channel_id);
        let state = if config.disabled {
            ChannelState::Disabled
        } else if slot.is_some_and(|s| s.anchoring) {
            ChannelState::Anchoring
        } else if let Some(pending) = slot.and_then(|s| s.pending.as_ref()) {
            ChannelState::Pending {
                remaining: pending.deadline.saturating_duration_since(Instant::now()),
            }
        } else {
            ChannelState::Idle
        };

        Ok(StickyStatus {
            config,
            state,
            delay: self.settings.delay,
        })
    }

    /// Turns protection on or off and returns the updated configuration.
    pub async fn set_protected(
        &self,
        channel_id: u64,
        protected: bool,
    ) -> Result<StickyConfig, StickyError> {
        let updated = self
            .persist(|snapshot| {
                snapshot.get_mut(channel_id).map(|config| {
                    config.protected = protected;
                    config.clone()
                })
            })
            .await?
            .ok_or(StickyError::NotConfigured)?;

        tracing::info!(
            "Sticky message protection in channel {} set to {}",
            channel_id,
            protected
        );

        Ok(updated)
    }

    /// Re-enables a sticky, clearing its error count, and anchors it once.
    pub async fn reset(&self, channel_id: u64) -> Result<AnchorOutcome, StickyError> {
        let lock = self.anchor_lock(channel_id).await;
        let _guard = lock.lock().await;

        self.persist(|snapshot| {
            snapshot.get_mut(channel_id).map(|config| {
                config.disabled = false;
                config.error_count = 0;
            })
        })
        .await?
        .ok_or(StickyError::NotConfigured)?;

        tracing::info!("Sticky message in channel {} reset", channel_id);

        Ok(self.anchor_locked(channel_id).await?)
    }

    /// Drops the configuration of a channel that no longer exists.
    ///
    /// # Returns
    /// - `Ok(true)` - A configuration was dropped
    /// - `Ok(false)` - The channel had no sticky
    pub async fn forget_channel(&self, channel_id: u64) -> Result<bool, StoreError> {
        self.cancel_pending(channel_id).await;

        if self.config(channel_id).await.is_none() {
            return Ok(false);
        }

        let removed = self
            .persist(|snapshot| snapshot.remove(channel_id))
            .await?
            .is_some();
        self.clear_slot(channel_id).await;

        Ok(removed)
    }

    async fn clear_slot(&self, channel_id: u64) {
        let mut channels = self.channels.lock().await;
        if let Some(slot) = channels.get_mut(&channel_id) {
            slot.last_anchored = None;
        }
    }
}
