//! Adapter implementations for session refresh ports.

pub mod memory;

mod dispatch;

pub use dispatch::DaemonTransport;
