//! Parley: session refresh for a messaging daemon client.
//!
//! This crate keeps a client's view of a messaging session (the signed-in
//! profile, the contact list, and the chat list) in step with a daemon that
//! answers requests asynchronously, one callback per request.
//!
//! # Architecture
//!
//! Parley follows hexagonal architecture principles:
//!
//! - **Domain**: Session entities and state, free of transport concerns
//! - **Ports**: Trait interfaces for the daemon transport and connection
//! - **Adapters**: In-memory and tokio-backed transports
//! - **Services**: Refresh orchestration built on completion primitives
//!
//! # Modules
//!
//! - [`coordination`]: Completion signals, counting barriers, and join-all
//! - [`session`]: Session model and refresh orchestration

pub mod coordination;
pub mod session;
