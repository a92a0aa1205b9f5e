//! Gateway scenario tests
//!
//! End-to-end flows through the router, delivery engine, and registry using
//! in-memory collaborator doubles.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use integration_tests::{assert_no_frame, recv_event, StaticDirectory, TestGateway};
use hrlink_core::{MessageId, MessageStore, NotificationKind, Role, UserId};
use hrlink_gateway::protocol::OutboundEvent;
use hrlink_gateway::Target;

// ============================================================================
// Chat round-trip
// ============================================================================

#[tokio::test]
async fn chat_message_reaches_recipient_only() {
    let gateway = TestGateway::new();
    let (alice, mut alice_rx) = gateway.connect(1);
    let (_bob, mut bob_rx) = gateway.connect(2);
    let (_carol, mut carol_rx) = gateway.connect(3);

    gateway
        .send_frame(&alice, r#"{"type":"chat_message","recipient_id":2,"body":"hi"}"#)
        .await;

    let event = recv_event(&mut bob_rx).await;
    assert_eq!(event["type"], "chat_message");
    assert_eq!(event["sender_id"], 1);
    assert_eq!(event["recipient_id"], 2);
    assert_eq!(event["body"], "hi");

    // Uninvolved user receives nothing; single-tab sender gets no echo
    assert_no_frame(&mut carol_rx);
    assert_no_frame(&mut alice_rx);

    assert_eq!(gateway.store.message_count().await, 1);
}

#[tokio::test]
async fn chat_message_echoes_to_senders_other_tabs() {
    let gateway = TestGateway::new();
    // User A on two tabs, user B on one
    let (tab1, mut tab1_rx) = gateway.connect(1);
    let (_tab2, mut tab2_rx) = gateway.connect(1);
    let (_bob, mut bob_rx) = gateway.connect(2);

    gateway
        .send_frame(&tab1, r#"{"type":"chat_message","recipient_id":2,"body":"hi"}"#)
        .await;

    // B receives the message
    let event = recv_event(&mut bob_rx).await;
    assert_eq!(event["sender_id"], 1);
    assert_eq!(event["body"], "hi");

    // A's second tab receives the echo; the originating tab does not
    let echo = recv_event(&mut tab2_rx).await;
    assert_eq!(echo["type"], "chat_message");
    assert_eq!(echo["body"], "hi");
    assert_no_frame(&mut tab1_rx);

    // Registry still shows 2 connections for A, 1 for B
    assert_eq!(gateway.state.registry().connections_for(UserId::new(1)).len(), 2);
    assert_eq!(gateway.state.registry().connections_for(UserId::new(2)).len(), 1);
}

// ============================================================================
// Read receipts
// ============================================================================

#[tokio::test]
async fn mark_read_sends_receipt_to_original_sender() {
    let gateway = TestGateway::new();
    let (alice, mut alice_rx) = gateway.connect(1);
    let (bob, mut bob_rx) = gateway.connect(2);

    gateway
        .send_frame(&alice, r#"{"type":"chat_message","recipient_id":2,"body":"lunch?"}"#)
        .await;
    let event = recv_event(&mut bob_rx).await;
    let message_id = event["id"].as_i64().unwrap();

    gateway
        .send_frame(&bob, &format!(r#"{{"type":"mark_read","message_id":{message_id}}}"#))
        .await;

    let receipt = recv_event(&mut alice_rx).await;
    assert_eq!(receipt["type"], "read_receipt");
    assert_eq!(receipt["message_id"], message_id);
}

#[tokio::test]
async fn mark_read_for_unknown_message_is_recovered() {
    let gateway = TestGateway::new();
    let (bob, mut bob_rx) = gateway.connect(2);

    gateway
        .send_frame(&bob, r#"{"type":"mark_read","message_id":999}"#)
        .await;

    // No receipt anywhere, and the connection still answers pings
    assert_no_frame(&mut bob_rx);
    gateway.send_frame(&bob, r#"{"type":"ping"}"#).await;
    assert_eq!(recv_event(&mut bob_rx).await["type"], "pong");
}

// ============================================================================
// Offline targets
// ============================================================================

#[tokio::test]
async fn notification_to_disconnected_user_is_a_noop() {
    let gateway = TestGateway::new();

    // B connects on two tabs, then disconnects both
    let (tab1, _rx1) = gateway.connect(2);
    let (tab2, _rx2) = gateway.connect(2);
    gateway.state.registry().unregister(UserId::new(2), tab1.id());
    gateway.state.registry().unregister(UserId::new(2), tab2.id());

    // An approval workflow fires a notification at B
    let sent = gateway
        .state
        .delivery()
        .deliver(
            &Target::user(UserId::new(2)),
            &OutboundEvent::Notification {
                user_id: UserId::new(2),
                title: "Leave request approved".to_string(),
                body: "Sep 1 - Sep 5".to_string(),
                kind: NotificationKind::LeaveApproved,
            },
        )
        .await;

    assert_eq!(sent, 0);
    assert!(!gateway.state.registry().is_online(UserId::new(2)));
    assert_eq!(gateway.state.registry().user_count(), 0);
}

// ============================================================================
// Role delivery
// ============================================================================

#[tokio::test]
async fn role_delivery_reaches_connected_members_only() {
    let gateway =
        TestGateway::with_directory(StaticDirectory::default().with_role("hr", &[1, 2, 3]));

    // Of three hr users, only user 2 is connected; user 7 is online but not hr
    let (_hr_online, mut hr_rx) = gateway.connect(2);
    let (_outsider, mut outsider_rx) = gateway.connect(7);

    let sent = gateway
        .state
        .delivery()
        .deliver(
            &Target::role(Role::new("hr")),
            &OutboundEvent::Notification {
                user_id: UserId::new(0),
                title: "New leave request".to_string(),
                body: "jina: 3 days medical".to_string(),
                kind: NotificationKind::LeaveRequest,
            },
        )
        .await;

    assert_eq!(sent, 1);
    let event = recv_event(&mut hr_rx).await;
    assert_eq!(event["kind"], "leave_request");
    assert_no_frame(&mut outsider_rx);
}

// ============================================================================
// Failure handling
// ============================================================================

#[tokio::test]
async fn persistence_failure_skips_delivery_and_keeps_connection() {
    let gateway = TestGateway::new();
    let (alice, mut alice_rx) = gateway.connect(1);
    let (_bob, mut bob_rx) = gateway.connect(2);

    gateway.store.fail_next();
    gateway
        .send_frame(&alice, r#"{"type":"chat_message","recipient_id":2,"body":"lost"}"#)
        .await;

    // Nothing delivered, nothing persisted
    assert_no_frame(&mut bob_rx);
    assert_eq!(gateway.store.message_count().await, 0);

    // The connection survived and works again
    gateway
        .send_frame(&alice, r#"{"type":"chat_message","recipient_id":2,"body":"retry"}"#)
        .await;
    assert_eq!(recv_event(&mut bob_rx).await["body"], "retry");
    assert_no_frame(&mut alice_rx);
}

#[tokio::test]
async fn malformed_and_unknown_frames_leave_connection_open() {
    let gateway = TestGateway::new();
    let (alice, mut alice_rx) = gateway.connect(1);

    gateway.send_frame(&alice, "not json").await;
    gateway.send_frame(&alice, r#"{"body":"no type"}"#).await;
    gateway
        .send_frame(&alice, r#"{"type":"chat_message","body":"missing recipient"}"#)
        .await;
    gateway
        .send_frame(&alice, r#"{"type":"presence_update","status":"away"}"#)
        .await;

    // None of those produced output or closed anything
    assert_no_frame(&mut alice_rx);
    assert!(!alice.is_closed());
    assert_eq!(gateway.state.registry().connection_count(), 1);

    gateway.send_frame(&alice, r#"{"type":"ping"}"#).await;
    assert_eq!(recv_event(&mut alice_rx).await["type"], "pong");
}

#[tokio::test]
async fn failed_peer_is_evicted_mid_delivery() {
    let gateway = TestGateway::new();
    let (alice, _alice_rx) = gateway.connect(1);
    let (_good, mut good_rx) = gateway.connect(2);
    let (bad, bad_rx) = gateway.connect(2);
    drop(bad_rx); // half-closed peer

    gateway
        .send_frame(&alice, r#"{"type":"chat_message","recipient_id":2,"body":"hi"}"#)
        .await;

    // The healthy connection got the message, the bad one is gone
    assert_eq!(recv_event(&mut good_rx).await["body"], "hi");
    let remaining = gateway.state.registry().connections_for(UserId::new(2));
    assert_eq!(remaining.len(), 1);
    assert!(remaining.iter().all(|c| c.id() != bad.id()));
}

// ============================================================================
// Keepalive
// ============================================================================

#[tokio::test]
async fn ping_refreshes_activity_and_answers_pong() {
    let gateway = TestGateway::new();
    let (alice, mut alice_rx) = gateway.connect(1);

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    let idle_before = alice.idle_for().await;

    gateway.send_frame(&alice, r#"{"type":"ping"}"#).await;

    assert_eq!(recv_event(&mut alice_rx).await["type"], "pong");
    assert!(alice.idle_for().await < idle_before);
}

// ============================================================================
// Registry invariants under churn
// ============================================================================

#[tokio::test]
async fn reconnect_after_full_disconnect_is_clean() {
    let gateway = TestGateway::new();
    let (old, _old_rx) = gateway.connect(5);
    gateway.state.registry().unregister(UserId::new(5), old.id());
    // Error path firing again is harmless
    gateway.state.registry().unregister(UserId::new(5), old.id());

    let (fresh, mut fresh_rx) = gateway.connect(5);
    assert_eq!(gateway.state.registry().connections_for(UserId::new(5)).len(), 1);

    gateway.send_frame(&fresh, r#"{"type":"ping"}"#).await;
    assert_eq!(recv_event(&mut fresh_rx).await["type"], "pong");

    // Duplicate ids never exist across reconnects
    assert_ne!(old.id(), fresh.id());
}

#[tokio::test]
async fn mark_read_persists_read_flag() {
    let gateway = TestGateway::new();
    let (alice, _alice_rx) = gateway.connect(1);
    let (bob, mut bob_rx) = gateway.connect(2);

    gateway
        .send_frame(&alice, r#"{"type":"chat_message","recipient_id":2,"body":"seen?"}"#)
        .await;
    let id = recv_event(&mut bob_rx).await["id"].as_i64().unwrap();

    gateway
        .send_frame(&bob, &format!(r#"{{"type":"mark_read","message_id":{id}}}"#))
        .await;

    let stored = gateway
        .store
        .mark_message_read(MessageId::new(id))
        .await
        .unwrap();
    assert!(stored.read);
}
