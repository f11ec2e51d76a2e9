use super::*;

/// Tests a moderator deleting the live sticky.
///
/// Expected: the sticky is recreated right away
#[tokio::test]
async fn recreates_externally_deleted_sticky() {
    let h = harness().await;
    let AnchorOutcome::Anchored { message_id } = h.service.anchor(GENERAL).await.unwrap() else {
        panic!("expected anchored");
    };
    h.gateway.remove_externally(message_id);

    let outcome = h.service.restore_deleted(GENERAL, message_id).await.unwrap();

    assert!(matches!(outcome, Some(AnchorOutcome::Anchored { .. })));
    assert_eq!(h.gateway.live_in(GENERAL).len(), 1);
}

/// Tests the notice posted after a deleted sticky was recreated.
///
/// Expected: the notice is sent after the sticky and deleted five seconds later
#[tokio::test(start_paused = true)]
async fn restore_posts_short_lived_notice() {
    let settings = StickySettings {
        protection_warning: Some("Sticky messages cannot be deleted".to_string()),
        ..StickySettings::default()
    };
    let h = harness_with(vec![plain_config(GENERAL)], settings).await;
    let AnchorOutcome::Anchored { message_id } = h.service.anchor(GENERAL).await.unwrap() else {
        panic!("expected anchored");
    };
    h.gateway.remove_externally(message_id);

    let outcome = h.service.restore_deleted(GENERAL, message_id).await.unwrap();
    sleep(Duration::from_secs(1)).await;

    let Some(AnchorOutcome::Anchored { message_id: restored }) = outcome else {
        panic!("expected the sticky to be recreated");
    };
    let sent = h.gateway.sent_to(GENERAL);
    assert_eq!(sent.len(), 3);
    let notice = &sent[2];
    assert_eq!(
        notice.body.text(),
        "Sticky messages cannot be deleted"
    );
    assert_eq!(h.gateway.live_in(GENERAL), vec![restored, notice.message_id]);

    sleep(Duration::from_secs(5)).await;

    assert_eq!(h.gateway.live_in(GENERAL), vec![restored]);
    assert!(h.gateway.deleted().contains(&notice.message_id));
}

/// Tests the delete event the engine causes itself when re-anchoring.
///
/// Expected: ignored, no extra send
#[tokio::test]
async fn ignores_deletions_of_replaced_renderings() {
    let h = harness().await;
    let AnchorOutcome::Anchored { message_id: old } = h.service.anchor(GENERAL).await.unwrap()
    else {
        panic!("expected anchored");
    };
    h.service.anchor(GENERAL).await.unwrap();

    let outcome = h.service.restore_deleted(GENERAL, old).await.unwrap();

    assert!(outcome.is_none());
    assert_eq!(h.gateway.sent_to(GENERAL).len(), 2);
}

/// Tests deletion restore when switched off.
///
/// Expected: nothing is resent
#[tokio::test]
async fn restore_can_be_disabled() {
    let settings = StickySettings {
        restore_deleted: false,
        ..StickySettings::default()
    };
    let h = harness_with(vec![plain_config(GENERAL)], settings).await;
    let AnchorOutcome::Anchored { message_id } = h.service.anchor(GENERAL).await.unwrap() else {
        panic!("expected anchored");
    };
    h.gateway.remove_externally(message_id);

    let outcome = h.service.restore_deleted(GENERAL, message_id).await.unwrap();

    assert!(outcome.is_none());
    assert_eq!(h.gateway.sent_to(GENERAL).len(), 1);
}

/// Tests the startup integrity check.
///
/// Expected: a missing rendering is repaired, a deleted channel is dropped,
/// a healthy sticky is left alone and a disabled one is skipped
#[tokio::test]
async fn integrity_check_repairs_and_drops() {
    let mut disabled = plain_config(4);
    disabled.disabled = true;
    let h = harness_with(
        vec![plain_config(1), plain_config(2), plain_config(3), disabled],
        StickySettings::default(),
    )
    .await;
    h.service.anchor(1).await.unwrap();
    h.service.anchor(2).await.unwrap();
    let AnchorOutcome::Anchored { message_id } = h.service.anchor(3).await.unwrap() else {
        panic!("expected anchored");
    };
    h.gateway.delete_channel(2);
    h.gateway.remove_externally(message_id);

    let report = h.service.validate_integrity().await.unwrap();

    assert_eq!(report.checked, 3);
    assert_eq!(report.repaired, 1);
    assert_eq!(report.removed, 1);
    let stored = h.store.current();
    assert!(stored.get(2).is_none());
    assert!(stored.get(4).is_some());
    assert_eq!(h.gateway.live_in(3).len(), 1);
    assert_eq!(h.gateway.sent_to(1).len(), 1);
}

/// Tests that a deleted channel's configuration is dropped.
///
/// Expected: Ok(true) once, Ok(false) afterwards
#[tokio::test]
async fn forget_channel_drops_config() {
    let h = harness().await;

    assert!(h.service.forget_channel(GENERAL).await.unwrap());
    assert!(!h.service.forget_channel(GENERAL).await.unwrap());
    assert!(h.store.current().channels.is_empty());
}
