//! Session refresh for a chat daemon reached through a request/reply transport.
//!
//! A refresh pulls the signed-in profile, the contact list, and the dialog
//! list from the daemon. Group dialogs need one further `chat_info` request
//! each, so the chat refresh fans out over a batch whose size is only known
//! once the dialog list has arrived. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
