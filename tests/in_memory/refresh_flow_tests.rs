//! End-to-end refreshes through the tokio transport and a scripted daemon.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parley::coordination::CoordinationError;
use parley::session::{
    adapters::memory::{ConnectionFlag, ScriptedDaemon},
    domain::{ChatKind, PeerId},
    ports::{Reply, Request},
    services::{RefreshConfig, RefreshError, RefreshScope},
};
use rstest::rstest;
use serde_json::json;

use super::helpers::{daemon_service, millis, scripted_session};

fn peer_id(raw: &str) -> PeerId {
    PeerId::new(raw).expect("valid peer id")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_refresh_populates_the_session() {
    let connection = ConnectionFlag::connected();
    let service = daemon_service(scripted_session(), &connection, RefreshConfig::default());
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let signal = service
        .refresh_all(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .expect("refresh should start");
    let summary = signal
        .wait()
        .await
        .expect("signal should fire")
        .expect("refresh should succeed");

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(summary.scope, RefreshScope::All);
    assert_eq!(summary.profile, Some(peer_id("me")));
    assert_eq!(summary.contacts, 3);
    assert_eq!(summary.chats, 3);
    assert!(summary.refreshed_at.is_some());

    let state = service.snapshot();
    let mut groups: Vec<&str> = state
        .chats()
        .iter()
        .filter(|chat| chat.kind() == ChatKind::Group)
        .map(|chat| chat.title())
        .collect();
    groups.sort_unstable();
    assert_eq!(groups, vec!["Compilers", "Kernels"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_chat_lookup_is_omitted() {
    let daemon = ScriptedDaemon::new()
        .with_reply(
            Request::new("dialog_list"),
            Reply::success(json!([
                {"type": "chat", "id": "g1"},
                {"type": "chat", "id": "g2"},
            ])),
        )
        .with_reply(
            Request::new("chat_info").with_arg("g1"),
            Reply::success(json!({"title": "Only one"})),
        );
    let connection = ConnectionFlag::connected();
    let service = daemon_service(daemon, &connection, RefreshConfig::default());

    let summary = service
        .refresh_chats(|_| {})
        .expect("refresh should start")
        .wait()
        .await
        .expect("signal should fire")
        .expect("refresh should succeed");

    assert_eq!(summary.chats, 1);
    assert_eq!(summary.omitted_chats, vec![peer_id("g2")]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_chat_lookup_fails_strict_refresh() {
    let daemon = ScriptedDaemon::new().with_reply(
        Request::new("dialog_list"),
        Reply::success(json!([{"type": "chat", "id": "g1"}])),
    );
    let connection = ConnectionFlag::connected();
    let service = daemon_service(daemon, &connection, RefreshConfig::strict());

    let outcome = service
        .refresh_chats(|_| {})
        .expect("refresh should start")
        .wait()
        .await
        .expect("signal should fire");

    assert!(matches!(
        outcome,
        Err(RefreshError::ChatInfoFailed { ref peer, .. }) if peer == &peer_id("g1")
    ));
    assert!(service.snapshot().chats().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn disconnected_session_is_rejected_up_front() {
    let daemon = scripted_session();
    let connection = ConnectionFlag::disconnected();
    let service = daemon_service(daemon.clone(), &connection, RefreshConfig::default());

    let result = service.refresh_all(|_| {});

    assert!(matches!(result, Err(RefreshError::NotConnected)));
    tokio::time::sleep(millis(10)).await;
    assert!(daemon.executed().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn connection_loss_during_fan_out_fails_refresh() {
    let daemon = ScriptedDaemon::new().with_delayed_reply(
        Request::new("dialog_list"),
        Reply::success(json!([{"type": "chat", "id": "g1"}])),
        millis(30),
    );
    let connection = ConnectionFlag::connected();
    let service = daemon_service(daemon.clone(), &connection, RefreshConfig::default());

    let signal = service.refresh_chats(|_| {}).expect("refresh should start");
    connection.set_usable(false);
    let outcome = signal.wait().await.expect("signal should fire");

    assert_eq!(outcome, Err(RefreshError::NotConnected));
    assert!(
        daemon
            .executed()
            .iter()
            .all(|request| request.command() != "chat_info")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_refreshes_each_complete_once() {
    let connection = ConnectionFlag::connected();
    let service = daemon_service(scripted_session(), &connection, RefreshConfig::default());
    let calls = Arc::new(AtomicUsize::new(0));

    let signals: Vec<_> = (0..3)
        .map(|_| {
            let counter = Arc::clone(&calls);
            service
                .refresh_all(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .expect("refresh should start")
        })
        .collect();
    for signal in signals {
        let outcome = signal.wait().await;
        assert!(matches!(outcome, Ok(Ok(_))));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(service.snapshot().contacts().len(), 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn waiting_on_a_fired_signal_resolves_immediately() {
    let connection = ConnectionFlag::connected();
    let daemon =
        ScriptedDaemon::new().with_reply(Request::new("dialog_list"), Reply::success(json!([])));
    let service = daemon_service(daemon, &connection, RefreshConfig::default());

    let signal = service.refresh_chats(|_| {}).expect("refresh should start");
    let first = signal.wait().await;
    let second = signal.wait().await;

    assert_eq!(first, second);
    assert!(!matches!(first, Err(CoordinationError::SignalAbandoned)));
}
