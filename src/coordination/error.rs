//! Error types for completion primitives.

use thiserror::Error;

/// Result type for coordination operations.
pub type CoordinationResult<T> = Result<T, CoordinationError>;

/// Errors returned by signals, barriers, and join coordinators.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CoordinationError {
    /// The signal has already fired.
    #[error("completion signal has already fired")]
    DoubleFire,

    /// The barrier's expected count was already set.
    #[error("expected count already set to {expected}")]
    ExpectedAlreadySet {
        /// Previously recorded expected count.
        expected: usize,
    },

    /// More arrivals were recorded than the barrier expects.
    #[error("barrier expects {expected} arrivals but {arrived} were recorded")]
    Overflow {
        /// Expected arrival count.
        expected: usize,
        /// Arrivals recorded, including the rejected one.
        arrived: usize,
    },

    /// Every handle to the signal was dropped before it fired.
    #[error("completion signal was dropped before firing")]
    SignalAbandoned,
}
