//! Scripted daemon with canned replies.

use crate::session::ports::{Daemon, Reply, Request};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

#[derive(Debug, Clone)]
struct ScriptedReply {
    reply: Reply,
    delay: Option<Duration>,
}

/// In-memory daemon answering from a script keyed by request.
///
/// Requests without a scripted reply fail with an "unknown request" reply.
/// A per-request delay lets tests make replies complete out of order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDaemon {
    script: Arc<RwLock<HashMap<Request, ScriptedReply>>>,
    executed: Arc<RwLock<Vec<Request>>>,
}

impl ScriptedDaemon {
    /// Creates a daemon with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts `reply` for `request`, replacing any earlier entry.
    #[must_use]
    pub fn with_reply(self, request: Request, reply: Reply) -> Self {
        self.script_entry(request, ScriptedReply { reply, delay: None });
        self
    }

    /// Scripts `reply` for `request`, delivered after `delay`.
    #[must_use]
    pub fn with_delayed_reply(self, request: Request, reply: Reply, delay: Duration) -> Self {
        self.script_entry(
            request,
            ScriptedReply {
                reply,
                delay: Some(delay),
            },
        );
        self
    }

    /// Returns every request executed so far.
    #[must_use]
    pub fn executed(&self) -> Vec<Request> {
        self.executed
            .read()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn script_entry(&self, request: Request, entry: ScriptedReply) {
        if let Ok(mut script) = self.script.write() {
            script.insert(request, entry);
        }
    }

    fn lookup(&self, request: &Request) -> Option<ScriptedReply> {
        self.script
            .read()
            .ok()
            .and_then(|script| script.get(request).cloned())
    }
}

#[async_trait]
impl Daemon for ScriptedDaemon {
    async fn execute(&self, request: &Request) -> Reply {
        if let Ok(mut executed) = self.executed.write() {
            executed.push(request.clone());
        }

        let Some(entry) = self.lookup(request) else {
            return Reply::failure(format!("unknown request: {request}"));
        };
        if let Some(delay) = entry.delay {
            tokio::time::sleep(delay).await;
        }
        entry.reply
    }
}
