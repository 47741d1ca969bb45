//! Shared fixtures for session service tests.

use std::sync::{Arc, Mutex};

use crate::session::{
    adapters::memory::QueuedTransport,
    ports::{MockConnectionState, Reply},
    services::{RefreshConfig, RefreshResult, RefreshSummary, SessionRefreshService},
};
use mockable::DefaultClock;
use serde_json::Value;

pub(super) type TestService =
    SessionRefreshService<QueuedTransport, MockConnectionState, DefaultClock>;

pub(super) type Completions = Arc<Mutex<Vec<RefreshResult<RefreshSummary>>>>;

pub(super) struct Harness {
    pub(super) transport: Arc<QueuedTransport>,
    pub(super) service: TestService,
}

impl Harness {
    pub(super) fn connected(config: RefreshConfig) -> Self {
        let mut connection = MockConnectionState::new();
        connection.expect_is_usable().return_const(true);
        Self::with_connection(connection, config)
    }

    pub(super) fn with_connection(connection: MockConnectionState, config: RefreshConfig) -> Self {
        let transport = Arc::new(QueuedTransport::new());
        let service = SessionRefreshService::with_config(
            Arc::clone(&transport),
            Arc::new(connection),
            Arc::new(DefaultClock),
            config,
        );
        Self { transport, service }
    }

    pub(super) fn reply(&self, command: &str, args: &[&str], payload: Value) {
        self.transport
            .reply_to(command, args, Reply::success(payload))
            .expect("request should be pending");
    }

    pub(super) fn reject(&self, command: &str, args: &[&str], reason: &str) {
        self.transport
            .reply_to(command, args, Reply::failure(reason))
            .expect("request should be pending");
    }
}

/// Returns a completion log and a continuation that appends to it.
pub(super) fn recorder() -> (
    Completions,
    impl FnOnce(RefreshResult<RefreshSummary>) + Send + 'static,
) {
    let log: Completions = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    (log, move |result| {
        sink.lock().expect("completion log lock").push(result);
    })
}

pub(super) fn completions(log: &Completions) -> Vec<RefreshResult<RefreshSummary>> {
    log.lock().expect("completion log lock").clone()
}
