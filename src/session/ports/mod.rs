//! Port contracts for session refresh.

mod connection;
mod daemon;
mod transport;

pub use connection::ConnectionState;
#[cfg(test)]
pub use connection::MockConnectionState;
pub use daemon::Daemon;
pub use transport::{Reply, ReplyHandler, Request, Transport, TransportError, TransportResult};
