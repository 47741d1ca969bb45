//! Queued transport whose replies are delivered explicitly.

use crate::session::ports::{
    Reply, ReplyHandler, Request, Transport, TransportError, TransportResult,
};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

struct PendingRequest {
    request: Request,
    on_reply: ReplyHandler,
}

#[derive(Default)]
struct QueueState {
    pending: Vec<PendingRequest>,
    sent: Vec<Request>,
}

/// In-memory transport that parks requests until a reply is supplied.
///
/// `send` only records the request. Callers deliver replies one at a time,
/// in any order, with [`reply_to`](Self::reply_to) or
/// [`reply_next`](Self::reply_next); each handler runs to completion before
/// the call returns. This makes arrival order a test input instead of an
/// accident of scheduling.
#[derive(Clone, Default)]
pub struct QueuedTransport {
    state: Arc<Mutex<QueueState>>,
}

impl fmt::Debug for QueuedTransport {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        formatter
            .debug_struct("QueuedTransport")
            .field("pending", &state.pending.len())
            .field("sent", &state.sent.len())
            .finish()
    }
}

impl QueuedTransport {
    /// Creates an empty transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns requests still awaiting a reply, oldest first.
    #[must_use]
    pub fn pending(&self) -> Vec<Request> {
        self.lock()
            .pending
            .iter()
            .map(|entry| entry.request.clone())
            .collect()
    }

    /// Returns every request ever sent, oldest first.
    #[must_use]
    pub fn sent(&self) -> Vec<Request> {
        self.lock().sent.clone()
    }

    /// Returns how many sent requests used `command`.
    #[must_use]
    pub fn sent_count(&self, command: &str) -> usize {
        self.lock()
            .sent
            .iter()
            .filter(|request| request.command() == command)
            .count()
    }

    /// Delivers `reply` to the oldest pending request matching `command`
    /// and `args`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::NoPendingRequest`] when nothing matches.
    pub fn reply_to(&self, command: &str, args: &[&str], reply: Reply) -> TransportResult<()> {
        let entry = {
            let mut state = self.lock();
            let position = state
                .pending
                .iter()
                .position(|entry| entry.request.matches(command, args))
                .ok_or_else(|| {
                    TransportError::NoPendingRequest(
                        Request::new(command)
                            .with_args(args.iter().copied())
                            .to_string(),
                    )
                })?;
            state.pending.remove(position)
        };
        (entry.on_reply)(reply);
        Ok(())
    }

    /// Delivers `reply` to the oldest pending request.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::NoPendingRequest`] when nothing is pending.
    pub fn reply_next(&self, reply: Reply) -> TransportResult<Request> {
        let entry = {
            let mut state = self.lock();
            if state.pending.is_empty() {
                return Err(TransportError::NoPendingRequest("<any>".to_owned()));
            }
            state.pending.remove(0)
        };
        let request = entry.request.clone();
        (entry.on_reply)(reply);
        Ok(request)
    }
}

impl Transport for QueuedTransport {
    fn send(&self, request: Request, on_reply: ReplyHandler) {
        let mut state = self.lock();
        state.sent.push(request.clone());
        state.pending.push(PendingRequest { request, on_reply });
    }
}
