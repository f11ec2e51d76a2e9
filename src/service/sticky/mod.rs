//! Sticky re-anchor engine.
//!
//! Keeps a configured message as the last message of its channel. Chat activity arms a
//! per-channel debounce timer; when the channel has been quiet for the configured delay
//! the previous rendering is deleted and a fresh one is sent.
//!
//! Per channel the engine is in one of four states: idle, pending (a timer is armed),
//! anchoring (delete + send in flight) or disabled (too many consecutive failures).
//! Each channel has at most one timer; a new qualifying event aborts and replaces it.
//! Anchoring of one channel is serialised by a per-channel lock, while different
//! channels proceed independently.

mod anchor;
mod command;

pub use command::{PlainStickyParam, RichStickyParam};

#[cfg(test)]
mod test;

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{sleep_until, Instant},
};

use crate::{
    config::StickySettings,
    data::store::StickyStore,
    error::store::StoreError,
    model::sticky::{ActivityEvent, ActivityOutcome, IgnoreReason, StickyConfig, StickySnapshot},
    service::gateway::ChannelGateway,
};

/// Timer armed for a channel.
struct PendingAnchor {
    generation: u64,
    deadline: Instant,
    task: JoinHandle<()>,
}

/// Runtime state of one channel.
#[derive(Default)]
struct ChannelSlot {
    pending: Option<PendingAnchor>,
    anchoring: bool,
    /// When this process last re-anchored the channel.
    last_anchored: Option<Instant>,
    /// Serialises anchoring and commands for the channel.
    anchor_lock: Arc<Mutex<()>>,
}

pub struct StickyService {
    store: Arc<dyn StickyStore>,
    gateway: Arc<dyn ChannelGateway>,
    settings: StickySettings,
    /// In-memory copy of the store; every change is saved before it replaces this copy.
    snapshot: Mutex<StickySnapshot>,
    channels: Mutex<HashMap<u64, ChannelSlot>>,
    generation: AtomicU64,
}

impl StickyService {
    /// Creates the engine and loads the stored configurations.
    ///
    /// # Returns
    /// - `Ok(Arc<StickyService>)` - Engine ready to receive activity
    /// - `Err(StoreError)` - The store could not be read
    pub async fn init(
        store: Arc<dyn StickyStore>,
        gateway: Arc<dyn ChannelGateway>,
        settings: StickySettings,
    ) -> Result<Arc<Self>, StoreError> {
        let snapshot = store.load().await?;
        tracing::info!(
            "Loaded {} sticky message configuration(s)",
            snapshot.channels.len()
        );

        Ok(Arc::new(Self {
            store,
            gateway,
            settings,
            snapshot: Mutex::new(snapshot),
            channels: Mutex::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }))
    }

    pub fn settings(&self) -> &StickySettings {
        &self.settings
    }

    /// Feeds one chat message to the engine.
    ///
    /// Qualifying activity in a channel with an active sticky arms the re-anchor timer
    /// for `now + delay`, cancelling the timer armed by earlier activity.
    pub async fn handle_activity(self: &Arc<Self>, event: ActivityEvent) -> ActivityOutcome {
        if event.is_system_actor {
            return ActivityOutcome::Ignored(IgnoreReason::SystemActor);
        }
        if event.is_command {
            return ActivityOutcome::Ignored(IgnoreReason::Command);
        }

        let Some(config) = self.config(event.channel_id).await else {
            return ActivityOutcome::Ignored(IgnoreReason::NotConfigured);
        };
        if config.disabled {
            return ActivityOutcome::Ignored(IgnoreReason::Disabled);
        }

        let now = Instant::now();
        let channel_id = event.channel_id;
        let mut channels = self.channels.lock().await;
        let slot = channels.entry(channel_id).or_default();

        if config.protected && self.within_protected_window(slot, &config, now) {
            return ActivityOutcome::Ignored(IgnoreReason::Protected);
        }

        let deadline = now + self.settings.delay;
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;

        if let Some(previous) = slot.pending.take() {
            previous.task.abort();
        }

        let service = Arc::clone(self);
        let task = tokio::spawn(async move {
            sleep_until(deadline).await;
            service.fire(channel_id, generation).await;
        });

        slot.pending = Some(PendingAnchor {
            generation,
            deadline,
            task,
        });

        tracing::debug!("Sticky re-anchor for channel {} armed", channel_id);

        ActivityOutcome::Armed { deadline }
    }

    /// Runs when a timer elapses; does nothing if the timer has been superseded.
    async fn fire(&self, channel_id: u64, generation: u64) {
        {
            let mut channels = self.channels.lock().await;
            let Some(slot) = channels.get_mut(&channel_id) else {
                return;
            };
            match &slot.pending {
                Some(pending) if pending.generation == generation => slot.pending = None,
                _ => return,
            }
        }

        match self.anchor(channel_id).await {
            Ok(outcome) => {
                tracing::debug!("Sticky re-anchor for channel {}: {:?}", channel_id, outcome)
            }
            Err(e) => tracing::error!(
                "Failed to persist sticky re-anchor for channel {}: {:?}",
                channel_id,
                e
            ),
        }
    }

    /// Whether a protected sticky was re-anchored less than one delay ago.
    ///
    /// Uses the in-process anchor time when there is one, otherwise the stored
    /// `last_updated` timestamp.
    fn within_protected_window(
        &self,
        slot: &ChannelSlot,
        config: &StickyConfig,
        now: Instant,
    ) -> bool {
        match slot.last_anchored {
            Some(anchored) => now.duration_since(anchored) < self.settings.delay,
            None => {
                let elapsed = chrono::Utc::now() - config.last_updated;
                elapsed
                    .to_std()
                    .map(|elapsed| elapsed < self.settings.delay)
                    .unwrap_or(true)
            }
        }
    }

    async fn config(&self, channel_id: u64) -> Option<StickyConfig> {
        self.snapshot.lock().await.get(channel_id).cloned()
    }

    /// Applies `change` to a copy of the snapshot, saves it, then commits it in memory.
    async fn persist<R>(
        &self,
        change: impl FnOnce(&mut StickySnapshot) -> R,
    ) -> Result<R, StoreError> {
        let mut current = self.snapshot.lock().await;
        let mut next = current.clone();
        let result = change(&mut next);
        self.store.save(&next).await?;
        *current = next;
        Ok(result)
    }

    async fn anchor_lock(&self, channel_id: u64) -> Arc<Mutex<()>> {
        let mut channels = self.channels.lock().await;
        Arc::clone(&channels.entry(channel_id).or_default().anchor_lock)
    }

    /// Aborts the armed timer of a channel, if any.
    async fn cancel_pending(&self, channel_id: u64) {
        let mut channels = self.channels.lock().await;
        if let Some(pending) = channels
            .get_mut(&channel_id)
            .and_then(|slot| slot.pending.take())
        {
            pending.task.abort();
        }
    }
}
