//! Async daemon port used by the tokio transport adapter.

use super::{Reply, Request};
use async_trait::async_trait;

/// Executes one request against the daemon and yields its reply.
#[async_trait]
pub trait Daemon: Send + Sync {
    /// Runs `request` to completion.
    async fn execute(&self, request: &Request) -> Reply;
}
