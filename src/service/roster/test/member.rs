use super::*;

#[tokio::test]
async fn boss_capacity_is_enforced() {
    let (service, store) = service();
    service
        .add_member(
            "boss",
            NewMemberParam {
                name: "Don Vito".to_string(),
                user_id: Some(1),
                id: None,
            },
            None,
        )
        .await
        .unwrap();

    let result = service
        .add_member(
            "boss",
            NewMemberParam {
                name: "Usurper".to_string(),
                user_id: Some(2),
                id: None,
            },
            None,
        )
        .await;

    assert!(matches!(
        result,
        Err(RosterError::PositionFull {
            current: 1,
            max: 1,
            ..
        })
    ));
    let boss = store.current();
    let members = &boss.position("boss").unwrap().members;
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].name, "Don Vito");
}

#[tokio::test]
async fn rejects_invalid_position_and_duplicates() {
    let (service, _) = service();
    service
        .add_member(
            "broker",
            NewMemberParam {
                id: Some("4242".to_string()),
                name: "Marco".to_string(),
                user_id: Some(5),
            },
            None,
        )
        .await
        .unwrap();

    let unknown = service.add_member("janitor", named("X"), None).await;
    let same_user = service
        .add_member(
            "broker",
            NewMemberParam {
                name: "Marco again".to_string(),
                user_id: Some(5),
                id: None,
            },
            None,
        )
        .await;
    let same_id_elsewhere = service
        .add_member(
            "recruit",
            NewMemberParam {
                id: Some("4242".to_string()),
                name: "Copycat".to_string(),
                user_id: None,
            },
            None,
        )
        .await;

    assert!(matches!(unknown, Err(RosterError::InvalidPosition(_))));
    assert!(matches!(same_user, Err(RosterError::DuplicateMember(_))));
    assert!(matches!(
        same_id_elsewhere,
        Err(RosterError::DuplicateMember(_))
    ));
}

#[tokio::test]
async fn remove_member_reports_missing_member() {
    let (service, store) = service();
    let member = service
        .add_member("recruit", named("Gino"), None)
        .await
        .unwrap();

    let missing = service.remove_member("recruit", "0000").await;
    let removed = service.remove_member("recruit", &member.id).await.unwrap();

    assert!(matches!(missing, Err(RosterError::MemberNotFound(_))));
    assert_eq!(removed.id, member.id);
    assert_eq!(store.current().metadata.total_members, 0);
}

#[tokio::test]
async fn update_member_changes_only_given_fields() {
    let (service, _) = service();
    let member = service
        .add_member(
            "recruit",
            NewMemberParam {
                name: "Paolo".to_string(),
                user_id: Some(3),
                id: None,
            },
            None,
        )
        .await
        .unwrap();

    let updated = service
        .update_member(
            "recruit",
            &member.id,
            UpdateMemberParam {
                name: Some("Paolo Rossi".to_string()),
                user_id: None,
            },
        )
        .await
        .unwrap();
    let empty = service
        .update_member("recruit", &member.id, UpdateMemberParam::default())
        .await;

    assert_eq!(updated.name, "Paolo Rossi");
    assert_eq!(updated.user_id, Some(3));
    assert!(updated.last_updated.is_some());
    assert!(matches!(empty, Err(RosterError::EmptyUpdate)));
}

#[tokio::test]
async fn move_to_full_position_leaves_source_unchanged() {
    let (service, store) = service();
    service.add_member("boss", named("Don"), None).await.unwrap();
    let captain = service
        .add_member("captain", named("Sal"), None)
        .await
        .unwrap();

    let result = service.move_member("captain", "boss", &captain.id).await;

    assert!(matches!(result, Err(RosterError::PositionFull { .. })));
    let roster = store.current();
    assert_eq!(roster.position("captain").unwrap().members, vec![captain]);
    assert_eq!(roster.position("boss").unwrap().members.len(), 1);
}

#[tokio::test]
async fn move_member_appends_at_destination() {
    let (service, store) = service();
    service
        .add_member("broker", named("First"), None)
        .await
        .unwrap();
    let recruit = service
        .add_member("recruit", named("Climber"), None)
        .await
        .unwrap();

    let moved = service
        .move_member("recruit", "broker", &recruit.id)
        .await
        .unwrap();
    let same = service.move_member("broker", "broker", &recruit.id).await;

    assert!(moved.moved_at.is_some());
    let roster = store.current();
    let brokers = &roster.position("broker").unwrap().members;
    assert_eq!(brokers.len(), 2);
    assert_eq!(brokers[1].id, recruit.id);
    assert!(roster.position("recruit").unwrap().members.is_empty());
    assert!(matches!(same, Err(RosterError::SamePosition)));
}

#[tokio::test]
async fn linked_user_cannot_hold_two_positions() {
    let (service, store) = service();
    service
        .add_member(
            "boss",
            NewMemberParam {
                name: "Don".to_string(),
                user_id: Some(77),
                id: None,
            },
            None,
        )
        .await
        .unwrap();

    let result = service
        .add_member(
            "broker",
            NewMemberParam {
                name: "Don again".to_string(),
                user_id: Some(77),
                id: None,
            },
            None,
        )
        .await;

    assert!(matches!(result, Err(RosterError::DuplicateMember(name)) if name.contains("Boss")));
    assert!(store.current().position("broker").unwrap().members.is_empty());
}

#[tokio::test]
async fn update_rejects_user_linked_to_another_member() {
    let (service, store) = service();
    service
        .add_member(
            "broker",
            NewMemberParam {
                name: "Marco".to_string(),
                user_id: Some(5),
                id: None,
            },
            None,
        )
        .await
        .unwrap();
    let other = service
        .add_member("broker", named("Bruno"), None)
        .await
        .unwrap();
    let recruit = service
        .add_member("recruit", named("Gino"), None)
        .await
        .unwrap();

    let same_position = service
        .update_member(
            "broker",
            &other.id,
            UpdateMemberParam {
                name: None,
                user_id: Some(Some(5)),
            },
        )
        .await;
    let other_position = service
        .update_member(
            "recruit",
            &recruit.id,
            UpdateMemberParam {
                name: None,
                user_id: Some(Some(5)),
            },
        )
        .await;

    assert!(matches!(same_position, Err(RosterError::DuplicateMember(_))));
    assert!(matches!(other_position, Err(RosterError::DuplicateMember(_))));
    let roster = store.current();
    let linked = roster
        .positions
        .iter()
        .flat_map(|p| p.members.iter())
        .filter(|m| m.user_id == Some(5))
        .count();
    assert_eq!(linked, 1);
}

#[tokio::test]
async fn update_keeps_own_link() {
    let (service, _) = service();
    let member = service
        .add_member(
            "broker",
            NewMemberParam {
                name: "Marco".to_string(),
                user_id: Some(5),
                id: None,
            },
            None,
        )
        .await
        .unwrap();

    let updated = service
        .update_member(
            "broker",
            &member.id,
            UpdateMemberParam {
                name: Some("Marco B".to_string()),
                user_id: Some(Some(5)),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.user_id, Some(5));
    assert_eq!(updated.name, "Marco B");
}
