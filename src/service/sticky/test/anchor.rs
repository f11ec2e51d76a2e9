use super::*;

/// Tests a successful anchor over an existing rendering.
///
/// Expected: old message deleted, new one sent, stored id updated and errors reset
#[tokio::test]
async fn replaces_previous_rendering() {
    let h = harness().await;

    let first = h.service.anchor(GENERAL).await.unwrap();
    let second = h.service.anchor(GENERAL).await.unwrap();

    let (AnchorOutcome::Anchored { message_id: old }, AnchorOutcome::Anchored { message_id: new }) =
        (first, second)
    else {
        panic!("expected two successful anchors");
    };
    assert_eq!(h.gateway.deleted(), vec![old]);
    assert_eq!(h.gateway.live_in(GENERAL), vec![new]);
    assert_eq!(h.store.current().get(GENERAL).unwrap().message_id, Some(new));
}

/// Tests anchoring when the previous rendering was deleted by hand.
///
/// Expected: NotFound on delete is tolerated and the sticky is resent
#[tokio::test]
async fn tolerates_missing_previous_message() {
    let mut config = plain_config(GENERAL);
    config.message_id = Some(123);
    let h = harness_with(vec![config], StickySettings::default()).await;

    let outcome = h.service.anchor(GENERAL).await.unwrap();

    assert!(matches!(outcome, AnchorOutcome::Anchored { .. }));
    assert_eq!(h.gateway.sent_to(GENERAL).len(), 1);
    assert_eq!(h.store.current().get(GENERAL).unwrap().error_count, 0);
}

/// Tests an anchor whose old rendering cannot be deleted.
///
/// Expected: nothing is sent, the old id is kept and retried by the next anchor
#[tokio::test]
async fn failed_delete_keeps_single_rendering() {
    let h = harness().await;
    let AnchorOutcome::Anchored { message_id: old } = h.service.anchor(GENERAL).await.unwrap()
    else {
        panic!("expected the first anchor to succeed");
    };

    h.gateway.set_fail_deletes(true);
    let failed = h.service.anchor(GENERAL).await.unwrap();

    assert_eq!(
        failed,
        AnchorOutcome::Failed {
            error_count: 1,
            disabled: false
        }
    );
    assert_eq!(h.gateway.sent_to(GENERAL).len(), 1);
    assert_eq!(h.gateway.live_in(GENERAL), vec![old]);
    assert_eq!(h.store.current().get(GENERAL).unwrap().message_id, Some(old));

    h.gateway.set_fail_deletes(false);
    let AnchorOutcome::Anchored { message_id: new } = h.service.anchor(GENERAL).await.unwrap()
    else {
        panic!("expected the retry to succeed");
    };

    assert_eq!(h.gateway.deleted(), vec![old]);
    assert_eq!(h.gateway.live_in(GENERAL), vec![new]);
}

/// Tests repeated send failures.
///
/// Expected: error count grows by one per failure and the sticky is disabled at five
#[tokio::test]
async fn disables_after_threshold_failures() {
    let h = harness().await;
    h.gateway.set_fail_sends(true);

    for attempt in 1..=4 {
        let outcome = h.service.anchor(GENERAL).await.unwrap();
        assert_eq!(
            outcome,
            AnchorOutcome::Failed {
                error_count: attempt,
                disabled: false
            }
        );
    }
    let outcome = h.service.anchor(GENERAL).await.unwrap();
    assert_eq!(
        outcome,
        AnchorOutcome::Failed {
            error_count: 5,
            disabled: true
        }
    );

    let stored = h.store.current();
    assert!(stored.get(GENERAL).unwrap().disabled);
    assert_eq!(
        h.service.status(GENERAL).await.unwrap().state,
        ChannelState::Disabled
    );
}

/// Tests that a success after failures resets the error count.
///
/// Expected: error count back to zero
#[tokio::test]
async fn success_resets_error_count() {
    let h = harness().await;
    h.gateway.set_fail_sends(true);
    h.service.anchor(GENERAL).await.unwrap();
    h.service.anchor(GENERAL).await.unwrap();

    h.gateway.set_fail_sends(false);
    h.service.anchor(GENERAL).await.unwrap();

    assert_eq!(h.store.current().get(GENERAL).unwrap().error_count, 0);
}

/// Tests activity on a disabled sticky.
///
/// Expected: ignored, never anchored until reset, anchored once by the reset
#[tokio::test(start_paused = true)]
async fn disabled_sticky_waits_for_reset() {
    let mut config = plain_config(GENERAL);
    config.disabled = true;
    config.error_count = 5;
    let h = harness_with(vec![config], StickySettings::default()).await;

    assert_eq!(
        h.service.handle_activity(chat(GENERAL)).await,
        ActivityOutcome::Ignored(IgnoreReason::Disabled)
    );
    assert_eq!(
        h.service.anchor(GENERAL).await.unwrap(),
        AnchorOutcome::Skipped(SkipReason::Disabled)
    );
    sleep(Duration::from_secs(60)).await;
    assert!(h.gateway.sent().is_empty());

    let outcome = h.service.reset(GENERAL).await.unwrap();

    assert!(matches!(outcome, AnchorOutcome::Anchored { .. }));
    let stored = h.store.current();
    let config = stored.get(GENERAL).unwrap();
    assert!(!config.disabled);
    assert_eq!(config.error_count, 0);
    assert_eq!(h.gateway.sent_to(GENERAL).len(), 1);
}

/// Tests a custom error threshold.
///
/// Expected: disabled on the second failure
#[tokio::test]
async fn honours_configured_threshold() {
    let settings = StickySettings {
        error_threshold: 2,
        ..StickySettings::default()
    };
    let h = harness_with(vec![plain_config(GENERAL)], settings).await;
    h.gateway.set_fail_sends(true);

    h.service.anchor(GENERAL).await.unwrap();
    let outcome = h.service.anchor(GENERAL).await.unwrap();

    assert_eq!(
        outcome,
        AnchorOutcome::Failed {
            error_count: 2,
            disabled: true
        }
    );
}
