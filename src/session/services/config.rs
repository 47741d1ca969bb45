//! Refresh configuration.

use serde::{Deserialize, Serialize};

/// What happens when a single `chat_info` lookup fails during the chat
/// fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatInfoFailurePolicy {
    /// Count the lookup as arrived, leave the chat out, and log the loss.
    #[default]
    Omit,
    /// Fail the chat refresh, and with it any enclosing full refresh.
    Abort,
}

/// Daemon command names used by a refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshCommands {
    /// Fetches the signed-in profile.
    pub profile: String,
    /// Fetches the contact list.
    pub contacts: String,
    /// Fetches the dialog list.
    pub dialogs: String,
    /// Fetches details for one group chat; takes the peer id as argument.
    pub chat_info: String,
}

impl Default for RefreshCommands {
    fn default() -> Self {
        Self {
            profile: "get_self".to_owned(),
            contacts: "contact_list".to_owned(),
            dialogs: "dialog_list".to_owned(),
            chat_info: "chat_info".to_owned(),
        }
    }
}

/// Configuration for session refresh.
///
/// # Examples
///
/// ```
/// use parley::session::services::{ChatInfoFailurePolicy, RefreshConfig};
///
/// let config = RefreshConfig::default();
/// assert_eq!(config.chat_info_failure, ChatInfoFailurePolicy::Omit);
///
/// let strict = RefreshConfig::strict();
/// assert_eq!(strict.chat_info_failure, ChatInfoFailurePolicy::Abort);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Daemon command names.
    pub commands: RefreshCommands,
    /// Handling of failed `chat_info` lookups.
    pub chat_info_failure: ChatInfoFailurePolicy,
}

impl RefreshConfig {
    /// Creates a configuration that fails the refresh on any lost chat.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            chat_info_failure: ChatInfoFailurePolicy::Abort,
            ..Self::default()
        }
    }
}
