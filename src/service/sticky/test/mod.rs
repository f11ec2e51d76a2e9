use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio::time::{sleep, Instant};

use crate::{
    config::StickySettings,
    data::memory::MemoryStickyStore,
    model::sticky::{
        ActivityEvent, ActivityOutcome, AnchorOutcome, ChannelState, IgnoreReason, SkipReason,
        StickyBody, StickyConfig, StickySnapshot,
    },
    service::{
        fake::FakeChannelGateway,
        sticky::{PlainStickyParam, RichStickyParam, StickyService},
    },
};

mod activity;
mod anchor;
mod restore;

const GENERAL: u64 = 500;

struct Harness {
    service: Arc<StickyService>,
    store: Arc<MemoryStickyStore>,
    gateway: Arc<FakeChannelGateway>,
}

fn plain_config(channel_id: u64) -> StickyConfig {
    StickyConfig::new(
        channel_id,
        StickyBody::Plain {
            text: "Welcome to the family".to_string(),
            image_url: None,
        },
        Some(1),
        Utc::now(),
    )
}

async fn harness_with(configs: Vec<StickyConfig>, settings: StickySettings) -> Harness {
    let mut snapshot = StickySnapshot::default();
    for config in configs {
        snapshot.insert(config);
    }
    let store = Arc::new(MemoryStickyStore::with_snapshot(snapshot));
    let gateway = Arc::new(FakeChannelGateway::new());
    let service = StickyService::init(store.clone(), gateway.clone(), settings)
        .await
        .unwrap();

    Harness {
        service,
        store,
        gateway,
    }
}

/// Engine with a plain sticky configured (but not yet sent) in `GENERAL`.
async fn harness() -> Harness {
    harness_with(vec![plain_config(GENERAL)], StickySettings::default()).await
}

fn chat(channel_id: u64) -> ActivityEvent {
    ActivityEvent {
        channel_id,
        author_id: 42,
        is_system_actor: false,
        is_command: false,
    }
}

/// Asserts that `actual` is `expected`, allowing for the timer's millisecond granularity.
fn assert_close(actual: Duration, expected: Duration) {
    let tolerance = Duration::from_millis(5);
    assert!(
        actual + tolerance >= expected && actual <= expected + tolerance,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}
