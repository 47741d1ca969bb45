//! Dialog-list peer descriptors.

use super::{
    PeerId, SessionDomainError,
    payload::{PEER_ID_FIELDS, PEER_ID_LABEL, as_object, peer_id_field, text_field},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Kind tag attached to a dialog-list entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerKind {
    /// One-to-one dialog with a user.
    User,
    /// Group chat that needs a `chat_info` lookup.
    Chat,
    /// Any other tag reported by the daemon.
    Other(String),
}

impl PeerKind {
    /// Parses a daemon tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "user" => Self::User,
            "chat" => Self::Chat,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Returns the canonical tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::User => "user",
            Self::Chat => "chat",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for PeerKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// One entry of the dialog list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerDescriptor {
    kind: PeerKind,
    id: PeerId,
    print_name: Option<String>,
}

impl PeerDescriptor {
    /// Builds a descriptor from a raw dialog-list entry.
    ///
    /// The kind tag is read from `peer_type` or `type`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError`] when the entry is not an object, has no
    /// kind tag, or has no identifier.
    pub fn from_payload(payload: &Value) -> Result<Self, SessionDomainError> {
        let object = as_object(payload, "peer")?;
        let tag = text_field(object, &["peer_type", "type"]).ok_or(
            SessionDomainError::MissingField {
                entity: "peer",
                field: "type",
            },
        )?;
        Ok(Self {
            kind: PeerKind::from_tag(&tag),
            id: peer_id_field(object, "peer", PEER_ID_FIELDS, PEER_ID_LABEL)?,
            print_name: text_field(object, &["print_name", "title"]),
        })
    }

    /// Returns the kind tag.
    #[must_use]
    pub const fn kind(&self) -> &PeerKind {
        &self.kind
    }

    /// Returns the peer identifier.
    #[must_use]
    pub const fn id(&self) -> &PeerId {
        &self.id
    }

    /// Returns the display name reported in the dialog list.
    #[must_use]
    pub fn print_name(&self) -> Option<&str> {
        self.print_name.as_deref()
    }
}
