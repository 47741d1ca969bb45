//! Tokio-backed transport with a single reply-dispatch task.

use crate::session::ports::{
    Daemon, Reply, ReplyHandler, Request, Transport, TransportError, TransportResult,
};
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

struct DispatchedReply {
    on_reply: ReplyHandler,
    reply: Reply,
}

/// Transport that runs daemon requests on tokio tasks.
///
/// Each request executes on its own task, so any number may be outstanding.
/// Replies are funnelled through one channel into a single dispatcher task
/// that invokes reply handlers one at a time, to completion. Handlers never
/// run in parallel with each other and `send` never runs a handler itself.
pub struct DaemonTransport<D> {
    daemon: Arc<D>,
    runtime: Handle,
    replies: mpsc::UnboundedSender<DispatchedReply>,
}

impl<D> fmt::Debug for DaemonTransport<D> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("DaemonTransport")
            .field("dispatcher_open", &!self.replies.is_closed())
            .finish_non_exhaustive()
    }
}

impl<D> DaemonTransport<D>
where
    D: Daemon + 'static,
{
    /// Creates the transport and spawns its dispatcher on the current runtime.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::NoRuntime`] when called outside a tokio
    /// runtime.
    pub fn spawn(daemon: Arc<D>) -> TransportResult<Self> {
        let runtime = Handle::try_current().map_err(|_| TransportError::NoRuntime)?;
        let (replies, mut inbox) = mpsc::unbounded_channel::<DispatchedReply>();

        runtime.spawn(async move {
            while let Some(dispatched) = inbox.recv().await {
                (dispatched.on_reply)(dispatched.reply);
            }
            debug!("reply dispatcher stopped");
        });

        Ok(Self {
            daemon,
            runtime,
            replies,
        })
    }
}

impl<D> Transport for DaemonTransport<D>
where
    D: Daemon + 'static,
{
    fn send(&self, request: Request, on_reply: ReplyHandler) {
        let daemon = Arc::clone(&self.daemon);
        let replies = self.replies.clone();
        debug!(%request, "dispatching daemon request");

        self.runtime.spawn(async move {
            let reply = daemon.execute(&request).await;
            if replies.send(DispatchedReply { on_reply, reply }).is_err() {
                warn!(%request, "reply dispatcher has shut down; dropping reply");
            }
        });
    }
}
