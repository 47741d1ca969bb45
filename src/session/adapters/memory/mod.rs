//! In-memory adapters for deterministic tests and local runs.

mod connection;
mod daemon;
mod transport;

pub use connection::ConnectionFlag;
pub use daemon::ScriptedDaemon;
pub use transport::QueuedTransport;
