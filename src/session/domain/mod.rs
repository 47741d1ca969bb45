//! Domain model for session refresh.
//!
//! Contacts and the signed-in profile share the [`Contact`] entity, chats are
//! [`Chat`] values built either straight from a dialog-list entry or from a
//! follow-up `chat_info` reply, and [`IdentitySet`] collapses repeated
//! sightings of the same contact. Transport concerns stay outside this
//! boundary.

mod chat;
mod contact;
mod error;
mod identity_set;
mod ids;
mod payload;
mod peer;
mod state;

pub use chat::{Chat, ChatKind};
pub use contact::Contact;
pub use error::SessionDomainError;
pub use identity_set::{Identified, IdentitySet};
pub use ids::{PeerId, RefreshId};
pub use peer::{PeerDescriptor, PeerKind};
pub use state::{RefreshDraft, SessionState};
