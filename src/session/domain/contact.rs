//! Contact entity, also used for the signed-in profile.

use super::{
    Identified, PeerId, SessionDomainError,
    payload::{PEER_ID_FIELDS, PEER_ID_LABEL, as_object, peer_id_field, text_field},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A user known to the daemon.
///
/// Identity is the normalized [`PeerId`]; incidental fields such as the
/// display name may differ between two payloads for the same contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    id: PeerId,
    print_name: String,
    first_name: Option<String>,
    last_name: Option<String>,
    username: Option<String>,
    phone: Option<String>,
}

impl Contact {
    /// Builds a contact from a raw user payload.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError`] when the payload is not an object or
    /// carries no usable identifier.
    pub fn from_payload(payload: &Value) -> Result<Self, SessionDomainError> {
        let object = as_object(payload, "contact")?;
        let id = peer_id_field(object, "contact", PEER_ID_FIELDS, PEER_ID_LABEL)?;
        let first_name = text_field(object, &["first_name"]);
        let last_name = text_field(object, &["last_name"]);
        let print_name = text_field(object, &["print_name"])
            .or_else(|| joined_name(first_name.as_deref(), last_name.as_deref()))
            .unwrap_or_else(|| id.to_string());

        Ok(Self {
            id,
            print_name,
            first_name,
            last_name,
            username: text_field(object, &["username"]),
            phone: text_field(object, &["phone"]),
        })
    }

    /// Returns the contact identifier.
    #[must_use]
    pub const fn id(&self) -> &PeerId {
        &self.id
    }

    /// Returns the name the daemon uses to address this contact.
    #[must_use]
    pub fn print_name(&self) -> &str {
        &self.print_name
    }

    /// Returns the first name, if known.
    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    /// Returns the last name, if known.
    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    /// Returns the public username, if any.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Returns the phone number, if shared.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }
}

impl Identified for Contact {
    type Key = PeerId;

    fn identity(&self) -> &PeerId {
        &self.id
    }
}

fn joined_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    match (first, last) {
        (Some(first_name), Some(last_name)) => Some(format!("{first_name} {last_name}")),
        (Some(name), None) | (None, Some(name)) => Some(name.to_owned()),
        (None, None) => None,
    }
}
