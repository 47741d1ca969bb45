//! Error types for refresh orchestration.

use crate::coordination::CoordinationError;
use crate::session::domain::{PeerId, SessionDomainError};
use thiserror::Error;

/// Result type for refresh operations.
pub type RefreshResult<T> = Result<T, RefreshError>;

/// Why a daemon request did not produce a usable payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamFailure {
    /// The daemon reported failure.
    #[error("daemon rejected the request: {0}")]
    Rejected(String),

    /// The reply succeeded but its payload had the wrong shape.
    #[error("expected {expected} in reply")]
    UnexpectedShape {
        /// Description of the expected shape.
        expected: &'static str,
    },

    /// An entity in the payload could not be built.
    #[error(transparent)]
    Malformed(#[from] SessionDomainError),
}

/// Errors that abort a refresh.
///
/// Cloneable so it can travel through completion signal outcomes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefreshError {
    /// The connection was not usable when a request was about to be sent.
    #[error("daemon connection is not usable")]
    NotConnected,

    /// A request failed or returned an unusable payload.
    #[error("request `{command}` failed: {failure}")]
    UpstreamRequestFailed {
        /// Command name of the failed request.
        command: String,
        /// Failure detail.
        failure: UpstreamFailure,
    },

    /// A `chat_info` lookup failed under the abort policy.
    #[error("chat_info for peer {peer} failed: {reason}")]
    ChatInfoFailed {
        /// Peer whose lookup failed.
        peer: PeerId,
        /// Failure detail.
        reason: String,
    },

    /// A completion primitive was misused.
    #[error(transparent)]
    Coordination(#[from] CoordinationError),
}

impl RefreshError {
    /// Builds a [`RefreshError::UpstreamRequestFailed`] for `command`.
    #[must_use]
    pub fn upstream(command: impl Into<String>, failure: impl Into<UpstreamFailure>) -> Self {
        Self::UpstreamRequestFailed {
            command: command.into(),
            failure: failure.into(),
        }
    }
}
