//! Shared builders for in-memory integration tests.

use std::sync::Arc;
use std::time::Duration;

use mockable::DefaultClock;
use parley::session::{
    adapters::{
        DaemonTransport,
        memory::{ConnectionFlag, ScriptedDaemon},
    },
    ports::{Reply, Request},
    services::{RefreshConfig, SessionRefreshService},
};
use serde_json::json;

pub type DaemonService =
    SessionRefreshService<DaemonTransport<ScriptedDaemon>, ConnectionFlag, DefaultClock>;

/// Builds a service over `daemon`; must run inside a tokio runtime.
pub fn daemon_service(
    daemon: ScriptedDaemon,
    connection: &ConnectionFlag,
    config: RefreshConfig,
) -> DaemonService {
    let transport = DaemonTransport::spawn(Arc::new(daemon)).expect("runtime should be available");
    SessionRefreshService::with_config(
        Arc::new(transport),
        Arc::new(connection.clone()),
        Arc::new(DefaultClock),
        config,
    )
}

pub fn millis(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Daemon answering a full refresh: one profile, two contacts, one direct
/// dialog, and two group chats whose lookups finish in reverse order.
pub fn scripted_session() -> ScriptedDaemon {
    ScriptedDaemon::new()
        .with_delayed_reply(
            Request::new("get_self"),
            Reply::success(json!({"id": "me", "print_name": "Me"})),
            millis(30),
        )
        .with_reply(
            Request::new("contact_list"),
            Reply::success(json!([
                {"id": "c1", "print_name": "Grace"},
                {"id": "c2", "print_name": "Linus"},
            ])),
        )
        .with_delayed_reply(
            Request::new("dialog_list"),
            Reply::success(json!([
                {"type": "user", "id": "c1", "print_name": "Grace"},
                {"type": "chat", "peer": "g1"},
                {"type": "chat", "peer": "g2"},
            ])),
            millis(5),
        )
        .with_delayed_reply(
            Request::new("chat_info").with_arg("g1"),
            Reply::success(json!({"title": "Compilers", "members": [{"id": "c1"}]})),
            millis(40),
        )
        .with_delayed_reply(
            Request::new("chat_info").with_arg("g2"),
            Reply::success(json!({"title": "Kernels", "members": [{"id": "c2"}]})),
            millis(10),
        )
}
