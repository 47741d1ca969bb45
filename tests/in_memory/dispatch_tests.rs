//! Integration tests for reply delivery through `DaemonTransport`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parley::session::{
    adapters::{DaemonTransport, memory::ScriptedDaemon},
    ports::{Reply, Request, Transport, TransportError},
};
use rstest::rstest;
use serde_json::json;
use tokio::sync::{mpsc, oneshot};

use super::helpers::millis;

#[rstest]
fn spawn_requires_a_runtime() {
    let result = DaemonTransport::spawn(Arc::new(ScriptedDaemon::new()));
    assert!(matches!(result, Err(TransportError::NoRuntime)));
}

#[rstest]
#[tokio::test]
async fn send_never_runs_the_handler_inline() {
    let daemon =
        ScriptedDaemon::new().with_reply(Request::new("ping"), Reply::success(json!("pong")));
    let transport = DaemonTransport::spawn(Arc::new(daemon)).expect("runtime should be available");
    let handled = Arc::new(AtomicBool::new(false));
    let (done, delivered) = oneshot::channel();

    let flag = Arc::clone(&handled);
    transport.send(
        Request::new("ping"),
        Box::new(move |reply| {
            flag.store(true, Ordering::SeqCst);
            let _ = done.send(reply);
        }),
    );

    assert!(!handled.load(Ordering::SeqCst));
    let reply = delivered.await.expect("reply should be delivered");
    assert_eq!(reply, Reply::success(json!("pong")));
    assert!(handled.load(Ordering::SeqCst));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unscripted_request_gets_failure_reply() {
    let daemon = ScriptedDaemon::new();
    let transport =
        DaemonTransport::spawn(Arc::new(daemon.clone())).expect("runtime should be available");
    let (done, delivered) = oneshot::channel();

    transport.send(
        Request::new("chat_info").with_arg("404"),
        Box::new(move |reply| {
            let _ = done.send(reply);
        }),
    );

    let reply = delivered.await.expect("reply should be delivered");
    assert!(!reply.success);
    assert!(reply.failure_reason().contains("unknown request: chat_info 404"));
    assert_eq!(daemon.executed(), vec![Request::new("chat_info").with_arg("404")]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replies_arrive_in_completion_order() {
    let daemon = ScriptedDaemon::new()
        .with_delayed_reply(Request::new("slow"), Reply::success(json!(1)), millis(40))
        .with_delayed_reply(Request::new("fast"), Reply::success(json!(2)), millis(1));
    let transport = DaemonTransport::spawn(Arc::new(daemon)).expect("runtime should be available");
    let (order, mut received) = mpsc::unbounded_channel();

    for command in ["slow", "fast"] {
        let sink = order.clone();
        transport.send(
            Request::new(command),
            Box::new(move |_| {
                let _ = sink.send(command);
            }),
        );
    }

    let first = received.recv().await.expect("first reply");
    let second = received.recv().await.expect("second reply");
    assert_eq!((first, second), ("fast", "slow"));
}
