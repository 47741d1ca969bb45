//! Chat entity.

use super::{
    PeerDescriptor, PeerId, SessionDomainError,
    payload::{PEER_ID_FIELDS, as_object, text_field},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether a chat is a direct dialog or a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatKind {
    /// Dialog with a single user.
    Direct,
    /// Group chat.
    Group,
}

/// A dialog visible in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    id: PeerId,
    kind: ChatKind,
    title: String,
    members: Vec<PeerId>,
}

impl Chat {
    /// Builds a direct chat straight from a `user` dialog entry.
    #[must_use]
    pub fn from_user_peer(peer: &PeerDescriptor) -> Self {
        Self {
            id: peer.id().clone(),
            kind: ChatKind::Direct,
            title: peer
                .print_name()
                .map_or_else(|| peer.id().to_string(), str::to_owned),
            members: vec![peer.id().clone()],
        }
    }

    /// Builds a group chat from a `chat_info` reply for `peer`.
    ///
    /// The reply's own identifier wins over the descriptor's; members without
    /// a usable identifier are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError::NotAnObject`] when the reply is not an
    /// object.
    pub fn from_chat_info(
        peer: &PeerDescriptor,
        payload: &Value,
    ) -> Result<Self, SessionDomainError> {
        let object = as_object(payload, "chat")?;
        let id = match text_field(object, PEER_ID_FIELDS) {
            Some(raw) => PeerId::new(raw)?,
            None => peer.id().clone(),
        };
        let title = text_field(object, &["title", "print_name"])
            .or_else(|| peer.print_name().map(str::to_owned))
            .unwrap_or_else(|| id.to_string());
        let members = object
            .get("members")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| {
                        entry
                            .as_object()
                            .and_then(|member| text_field(member, PEER_ID_FIELDS))
                            .and_then(|raw| PeerId::new(raw).ok())
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            id,
            kind: ChatKind::Group,
            title,
            members,
        })
    }

    /// Returns the chat identifier.
    #[must_use]
    pub const fn id(&self) -> &PeerId {
        &self.id
    }

    /// Returns the chat kind.
    #[must_use]
    pub const fn kind(&self) -> ChatKind {
        self.kind
    }

    /// Returns the chat title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the known members.
    #[must_use]
    pub fn members(&self) -> &[PeerId] {
        &self.members
    }
}
