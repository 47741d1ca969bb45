//! Error types for session domain construction.

use thiserror::Error;

/// Errors returned while building session entities from daemon payloads.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionDomainError {
    /// A peer identifier is empty after trimming.
    #[error("peer identifier must not be empty")]
    EmptyPeerId,

    /// The payload is not a JSON object.
    #[error("{entity} payload must be an object")]
    NotAnObject {
        /// Entity kind being constructed.
        entity: &'static str,
    },

    /// A required field is absent or has the wrong type.
    #[error("{entity} payload is missing field '{field}'")]
    MissingField {
        /// Entity kind being constructed.
        entity: &'static str,
        /// Field name, or the list of accepted aliases.
        field: &'static str,
    },
}
