//! Shared state and reply helpers for refresh operations.

use super::{RefreshConfig, RefreshError, RefreshResult, UpstreamFailure};
use crate::coordination::{CompletionSignal, Outcome};
use crate::session::domain::{RefreshDraft, SessionState};
use crate::session::ports::{ConnectionState, Reply};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::warn;

/// Draft shared between the reply handlers of one refresh.
pub(super) type SharedDraft = Arc<Mutex<RefreshDraft>>;

/// Signal reporting one refresh part's outcome.
pub(super) type PartSignal = CompletionSignal<Outcome<RefreshError>>;

/// Everything reply handlers need, shared behind one `Arc`.
pub(super) struct RefreshContext<T, N, C> {
    pub(super) transport: Arc<T>,
    pub(super) connection: Arc<N>,
    pub(super) clock: Arc<C>,
    pub(super) config: RefreshConfig,
    pub(super) state: Mutex<SessionState>,
}

impl<T, N, C> RefreshContext<T, N, C>
where
    N: ConnectionState,
{
    pub(super) fn ensure_connected(&self) -> RefreshResult<()> {
        if self.connection.is_usable() {
            Ok(())
        } else {
            Err(RefreshError::NotConnected)
        }
    }

    pub(super) fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub(super) fn lock_draft(draft: &SharedDraft) -> MutexGuard<'_, RefreshDraft> {
    draft.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fires a part signal, logging if it had already fired.
pub(super) fn settle(signal: &PartSignal, outcome: Outcome<RefreshError>) {
    if let Err(error) = signal.fire(outcome) {
        warn!(%error, "refresh part reported twice");
    }
}

/// Returns the payload of a successful reply.
pub(super) fn expect_success(command: &str, reply: Reply) -> RefreshResult<Value> {
    if reply.success {
        Ok(reply.payload)
    } else {
        Err(RefreshError::upstream(
            command,
            UpstreamFailure::Rejected(reply.failure_reason()),
        ))
    }
}

/// Returns the elements of a sequence payload.
pub(super) fn expect_sequence(command: &str, payload: Value) -> RefreshResult<Vec<Value>> {
    match payload {
        Value::Array(items) => Ok(items),
        _ => Err(RefreshError::upstream(
            command,
            UpstreamFailure::UnexpectedShape {
                expected: "a sequence",
            },
        )),
    }
}
