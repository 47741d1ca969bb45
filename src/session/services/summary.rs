//! Completion report for a refresh.

use crate::session::domain::{PeerId, RefreshId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which parts of the session a refresh covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshScope {
    /// Profile, contacts, and chats.
    All,
    /// Signed-in profile only.
    Profile,
    /// Contact list only.
    Contacts,
    /// Chat list only.
    Chats,
}

impl RefreshScope {
    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Profile => "profile",
            Self::Contacts => "contacts",
            Self::Chats => "chats",
        }
    }
}

impl fmt::Display for RefreshScope {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Outcome of a successful refresh, taken after the session was updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSummary {
    /// Correlation identifier of the run.
    pub refresh_id: RefreshId,
    /// Parts of the session covered.
    pub scope: RefreshScope,
    /// Time of the last full refresh, if any.
    pub refreshed_at: Option<DateTime<Utc>>,
    /// Identifier of the signed-in profile, if known.
    pub profile: Option<PeerId>,
    /// Number of contacts now held.
    pub contacts: usize,
    /// Number of chats now held.
    pub chats: usize,
    /// Group chats left out after a failed `chat_info` lookup.
    pub omitted_chats: Vec<PeerId>,
}
