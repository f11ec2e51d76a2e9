use super::*;

/// Tests the debounce scenario of two messages five seconds apart.
///
/// Expected: exactly one re-anchor, fired ten seconds after the second message
#[tokio::test(start_paused = true)]
async fn second_message_pushes_deadline_back() {
    let h = harness().await;
    let start = Instant::now();

    h.service.handle_activity(chat(GENERAL)).await;
    sleep(Duration::from_secs(5)).await;
    h.service.handle_activity(chat(GENERAL)).await;
    sleep(Duration::from_secs(20)).await;

    let sent = h.gateway.sent_to(GENERAL);
    assert_eq!(sent.len(), 1);
    assert_close(sent[0].at.duration_since(start), Duration::from_secs(15));
}

/// Tests a burst of messages inside one delay window.
///
/// Expected: one re-anchor for the whole burst
#[tokio::test(start_paused = true)]
async fn burst_results_in_single_anchor() {
    let h = harness().await;

    for _ in 0..20 {
        h.service.handle_activity(chat(GENERAL)).await;
        sleep(Duration::from_millis(300)).await;
    }
    sleep(Duration::from_secs(30)).await;

    assert_eq!(h.gateway.sent_to(GENERAL).len(), 1);
    let stored = h.store.current();
    assert_eq!(
        stored.get(GENERAL).unwrap().message_id,
        Some(h.gateway.sent_to(GENERAL)[0].message_id)
    );
}

/// Tests that nothing fires before the delay has elapsed.
///
/// Expected: no send at 9.9 s, one send after 10 s
#[tokio::test(start_paused = true)]
async fn fires_only_after_delay() {
    let h = harness().await;

    let outcome = h.service.handle_activity(chat(GENERAL)).await;
    assert!(matches!(outcome, ActivityOutcome::Armed { .. }));

    sleep(Duration::from_millis(9_900)).await;
    assert!(h.gateway.sent().is_empty());

    sleep(Duration::from_millis(200)).await;
    assert_eq!(h.gateway.sent_to(GENERAL).len(), 1);
}

/// Tests that a quiet channel is never re-anchored.
///
/// Expected: no sends without activity
#[tokio::test(start_paused = true)]
async fn quiet_channel_never_anchors() {
    let h = harness().await;

    sleep(Duration::from_secs(3600)).await;

    assert!(h.gateway.sent().is_empty());
}

/// Tests the events that must not arm a timer.
///
/// Expected: bots, commands and unconfigured channels are ignored
#[tokio::test(start_paused = true)]
async fn ignores_non_qualifying_events() {
    let h = harness().await;

    let mut bot = chat(GENERAL);
    bot.is_system_actor = true;
    let mut command = chat(GENERAL);
    command.is_command = true;

    assert_eq!(
        h.service.handle_activity(bot).await,
        ActivityOutcome::Ignored(IgnoreReason::SystemActor)
    );
    assert_eq!(
        h.service.handle_activity(command).await,
        ActivityOutcome::Ignored(IgnoreReason::Command)
    );
    assert_eq!(
        h.service.handle_activity(chat(999)).await,
        ActivityOutcome::Ignored(IgnoreReason::NotConfigured)
    );

    sleep(Duration::from_secs(60)).await;
    assert!(h.gateway.sent().is_empty());
}

/// Tests that channels are debounced independently.
///
/// Expected: each channel re-anchors once, at its own deadline
#[tokio::test(start_paused = true)]
async fn channels_are_independent() {
    let h = harness_with(
        vec![plain_config(1), plain_config(2)],
        StickySettings::default(),
    )
    .await;
    let start = Instant::now();

    h.service.handle_activity(chat(1)).await;
    sleep(Duration::from_secs(4)).await;
    h.service.handle_activity(chat(2)).await;
    sleep(Duration::from_secs(30)).await;

    let first = h.gateway.sent_to(1);
    let second = h.gateway.sent_to(2);
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_close(first[0].at.duration_since(start), Duration::from_secs(10));
    assert_close(second[0].at.duration_since(start), Duration::from_secs(14));
}

/// Tests a protected sticky right after it was anchored.
///
/// Expected: activity within one delay is ignored, later activity re-arms
#[tokio::test(start_paused = true)]
async fn protected_sticky_ignores_recent_activity() {
    let h = harness().await;
    h.service.set_protected(GENERAL, true).await.unwrap();
    h.service.anchor(GENERAL).await.unwrap();

    sleep(Duration::from_secs(3)).await;
    assert_eq!(
        h.service.handle_activity(chat(GENERAL)).await,
        ActivityOutcome::Ignored(IgnoreReason::Protected)
    );

    sleep(Duration::from_secs(8)).await;
    assert!(matches!(
        h.service.handle_activity(chat(GENERAL)).await,
        ActivityOutcome::Armed { .. }
    ));
}

/// Tests the status of a channel with an armed timer.
///
/// Expected: pending with the remaining time until the deadline
#[tokio::test(start_paused = true)]
async fn status_reports_pending_deadline() {
    let h = harness().await;

    h.service.handle_activity(chat(GENERAL)).await;
    sleep(Duration::from_secs(4)).await;

    let status = h.service.status(GENERAL).await.unwrap();
    match status.state {
        ChannelState::Pending { remaining } => assert_close(remaining, Duration::from_secs(6)),
        other => panic!("expected pending state, got {:?}", other),
    }
    assert_eq!(status.delay, Duration::from_secs(10));
}
