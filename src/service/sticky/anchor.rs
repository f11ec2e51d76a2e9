use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio::time::{sleep, Instant};

use crate::{
    error::{platform::PlatformError, store::StoreError},
    model::sticky::{AnchorOutcome, IntegrityReport, SkipReason, StickyBody, StickyConfig},
    service::sticky::StickyService,
};

/// How long the notice after a restored sticky stays visible.
const WARNING_LIFETIME: Duration = Duration::from_secs(5);

impl StickyService {
    /// Re-anchors a channel's sticky now.
    ///
    /// Waits for any anchoring or command already running for the channel.
    ///
    /// # Returns
    /// - `Ok(AnchorOutcome)` - What happened; send failures are reported here, not as errors
    /// - `Err(StoreError)` - The outcome could not be saved
    pub async fn anchor(&self, channel_id: u64) -> Result<AnchorOutcome, StoreError> {
        let lock = self.anchor_lock(channel_id).await;
        let _guard = lock.lock().await;

        self.anchor_locked(channel_id).await
    }

    /// Deletes the previous rendering and sends a fresh one.
    ///
    /// Callers must hold the channel's anchor lock.
    pub(super) async fn anchor_locked(&self, channel_id: u64) -> Result<AnchorOutcome, StoreError> {
        let Some(config) = self.config(channel_id).await else {
            return Ok(AnchorOutcome::Skipped(SkipReason::NotConfigured));
        };
        if config.disabled {
            return Ok(AnchorOutcome::Skipped(SkipReason::Disabled));
        }

        self.set_anchoring(channel_id, true).await;
        let result = self.replace_rendering(&config).await;
        let outcome = self.record_result(&config, result).await;
        self.set_anchoring(channel_id, false).await;

        outcome
    }

    /// Deletes the old rendering, then sends a fresh one.
    ///
    /// An old rendering that is already gone is fine. Any other delete failure aborts
    /// the anchor without sending, so the channel never shows two stickies. Returns
    /// whether the old rendering is known to be gone alongside the send result.
    async fn replace_rendering(&self, config: &StickyConfig) -> (bool, Result<u64, PlatformError>) {
        let channel_id = config.channel_id;

        if let Some(message_id) = config.message_id {
            match self.gateway.delete_message(channel_id, message_id).await {
                Ok(()) => {}
                Err(PlatformError::NotFound) => {
                    tracing::debug!(
                        "Previous sticky message {} in channel {} was already deleted",
                        message_id,
                        channel_id
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to delete previous sticky message {} in channel {}: {}",
                        message_id,
                        channel_id,
                        e
                    );
                    return (false, Err(e));
                }
            }
        }

        let sent = self.gateway.send_message(channel_id, &config.body).await;

        (true, sent)
    }

    async fn record_result(
        &self,
        config: &StickyConfig,
        result: (bool, Result<u64, PlatformError>),
    ) -> Result<AnchorOutcome, StoreError> {
        let channel_id = config.channel_id;
        let threshold = self.settings.error_threshold;

        match result {
            (_, Ok(message_id)) => {
                let now = Utc::now();
                self.persist(|snapshot| {
                    if let Some(stored) = snapshot.get_mut(channel_id) {
                        stored.message_id = Some(message_id);
                        stored.last_updated = now;
                        stored.error_count = 0;
                    }
                })
                .await?;

                let mut channels = self.channels.lock().await;
                channels.entry(channel_id).or_default().last_anchored = Some(Instant::now());

                Ok(AnchorOutcome::Anchored { message_id })
            }
            (previous_gone, Err(e)) => {
                tracing::warn!(
                    "Failed to re-anchor sticky message in channel {}: {}",
                    channel_id,
                    e
                );

                let (error_count, disabled) = self
                    .persist(|snapshot| match snapshot.get_mut(channel_id) {
                        Some(stored) => {
                            if previous_gone {
                                stored.message_id = None;
                            }
                            stored.error_count = stored.error_count.saturating_add(1);
                            if stored.error_count >= threshold {
                                stored.disabled = true;
                            }
                            (stored.error_count, stored.disabled)
                        }
                        None => (0, false),
                    })
                    .await?;

                if disabled {
                    tracing::error!(
                        "Sticky message in channel {} disabled after {} consecutive failures",
                        channel_id,
                        error_count
                    );
                }

                Ok(AnchorOutcome::Failed {
                    error_count,
                    disabled,
                })
            }
        }
    }

    async fn set_anchoring(&self, channel_id: u64, anchoring: bool) {
        let mut channels = self.channels.lock().await;
        channels.entry(channel_id).or_default().anchoring = anchoring;
    }

    /// Recreates a sticky whose live rendering was deleted by someone else.
    ///
    /// Deletions the engine performs itself never match the stored message id by the
    /// time they are reported, so they are ignored here.
    ///
    /// # Returns
    /// - `Ok(Some(AnchorOutcome))` - The deleted message was the live sticky and was resent
    /// - `Ok(None)` - Not a live sticky, restoring is switched off, or the sticky is disabled
    /// - `Err(StoreError)` - The outcome could not be saved
    pub async fn restore_deleted(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> Result<Option<AnchorOutcome>, StoreError> {
        if !self.settings.restore_deleted {
            return Ok(None);
        }

        let is_live = |config: &Option<StickyConfig>| {
            config
                .as_ref()
                .is_some_and(|c| c.message_id == Some(message_id) && !c.disabled)
        };
        if !is_live(&self.config(channel_id).await) {
            return Ok(None);
        }

        let lock = self.anchor_lock(channel_id).await;
        let _guard = lock.lock().await;

        // An anchor may have replaced the message while we waited for the lock.
        if !is_live(&self.config(channel_id).await) {
            return Ok(None);
        }

        tracing::info!(
            "Sticky message {} in channel {} was deleted, recreating it",
            message_id,
            channel_id
        );

        let outcome = self.anchor_locked(channel_id).await?;
        if let AnchorOutcome::Anchored { .. } = outcome {
            self.post_protection_warning(channel_id);
        }
        Ok(Some(outcome))
    }

    /// Posts the configured protection notice and deletes it again shortly after.
    fn post_protection_warning(&self, channel_id: u64) {
        let Some(text) = self.settings.protection_warning.clone() else {
            return;
        };
        let gateway = Arc::clone(&self.gateway);

        tokio::spawn(async move {
            let body = StickyBody::Plain {
                text,
                image_url: None,
            };
            let message_id = match gateway.send_message(channel_id, &body).await {
                Ok(message_id) => message_id,
                Err(e) => {
                    tracing::warn!(
                        "Failed to post sticky protection notice in channel {}: {}",
                        channel_id,
                        e
                    );
                    return;
                }
            };

            sleep(WARNING_LIFETIME).await;

            match gateway.delete_message(channel_id, message_id).await {
                Ok(()) | Err(PlatformError::NotFound) => {}
                Err(e) => tracing::warn!(
                    "Failed to delete sticky protection notice {} in channel {}: {}",
                    message_id,
                    channel_id,
                    e
                ),
            }
        });
    }

    /// Checks that every active sticky still has its live rendering.
    ///
    /// Missing renderings are re-anchored; configurations whose channel no longer exists
    /// are dropped. Lookup failures are logged and skipped.
    pub async fn validate_integrity(&self) -> Result<IntegrityReport, StoreError> {
        let configs: Vec<StickyConfig> = self
            .snapshot
            .lock()
            .await
            .channels
            .values()
            .filter(|c| !c.disabled)
            .cloned()
            .collect();

        let mut report = IntegrityReport::default();

        for config in configs {
            let channel_id = config.channel_id;
            report.checked += 1;

            let needs_repair = match config.message_id {
                None => true,
                Some(message_id) => {
                    match self.gateway.message_exists(channel_id, message_id).await {
                        Ok(exists) => !exists,
                        Err(PlatformError::UnknownChannel(_)) => {
                            tracing::info!(
                                "Dropping sticky message for deleted channel {}",
                                channel_id
                            );
                            if self.forget_channel(channel_id).await? {
                                report.removed += 1;
                            }
                            continue;
                        }
                        Err(e) => {
                            tracing::warn!(
                                "Failed to check sticky message {} in channel {}: {}",
                                message_id,
                                channel_id,
                                e
                            );
                            continue;
                        }
                    }
                }
            };

            if needs_repair {
                if let AnchorOutcome::Anchored { .. } = self.anchor(channel_id).await? {
                    report.repaired += 1;
                }
            }
        }

        tracing::info!(
            "Sticky integrity check: {} checked, {} repaired, {} removed",
            report.checked,
            report.repaired,
            report.removed
        );

        Ok(report)
    }
}
