//! Completion primitives for callback-driven request/response exchanges.
//!
//! A daemon that answers every request exactly once, out of the caller's
//! stack, needs a small vocabulary for "tell me when this is done":
//!
//! - [`CompletionSignal`]: a single-fire event that reactions can attach to
//!   before or after it fires
//! - [`CountingBarrier`]: fires once a known number of arrivals is reached,
//!   with the expected count supplied up front or discovered later
//! - [`JoinAll`]: waits for every member of a fixed set of named operations
//!
//! Outcomes are `Result<(), E>` so a fatal failure can be forced through the
//! same channel that reports success.

mod barrier;
mod error;
mod join;
mod signal;

pub use barrier::CountingBarrier;
pub use error::{CoordinationError, CoordinationResult};
pub use join::{Arrival, JoinAll, JoinAllHandle};
pub use signal::CompletionSignal;

/// Outcome carried by barrier and join signals.
pub type Outcome<E> = Result<(), E>;

#[cfg(test)]
mod tests;
