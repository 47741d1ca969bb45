//! Application services for session refresh.

mod chats;
mod config;
mod context;
mod error;
mod refresh;
mod summary;

pub use config::{ChatInfoFailurePolicy, RefreshCommands, RefreshConfig};
pub use error::{RefreshError, RefreshResult, UpstreamFailure};
pub use refresh::{RefreshSignal, SessionRefreshService};
pub use summary::{RefreshScope, RefreshSummary};
