//! Field extraction helpers for daemon JSON payloads.

use super::{PeerId, SessionDomainError};
use serde_json::{Map, Value};

pub(super) type Object = Map<String, Value>;

pub(super) fn as_object<'a>(
    payload: &'a Value,
    entity: &'static str,
) -> Result<&'a Object, SessionDomainError> {
    payload
        .as_object()
        .ok_or(SessionDomainError::NotAnObject { entity })
}

/// Returns the first non-blank field among `names`, accepting strings and
/// integers.
pub(super) fn text_field(object: &Object, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| match object.get(*name) {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text.trim().to_owned()),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

pub(super) fn peer_id_field(
    object: &Object,
    entity: &'static str,
    names: &'static [&'static str],
    label: &'static str,
) -> Result<PeerId, SessionDomainError> {
    let raw = text_field(object, names).ok_or(SessionDomainError::MissingField {
        entity,
        field: label,
    })?;
    PeerId::new(raw)
}

/// Field names under which the daemon reports a peer identifier.
pub(super) const PEER_ID_FIELDS: &[&str] = &["id", "peer_id", "peer"];

/// Label used in errors for [`PEER_ID_FIELDS`].
pub(super) const PEER_ID_LABEL: &str = "id";
