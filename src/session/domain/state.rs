//! Session state and the per-refresh staging draft.

use super::{Chat, Contact, IdentitySet, PeerId};
use chrono::{DateTime, Utc};

/// Everything the session knows about the signed-in account.
///
/// Contacts only ever grow; chats are replaced wholesale by each chat
/// refresh and are not deduplicated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    profile: Option<Contact>,
    contacts: IdentitySet<Contact>,
    chats: Vec<Chat>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl SessionState {
    /// Creates an empty session state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the signed-in profile, once fetched.
    #[must_use]
    pub const fn profile(&self) -> Option<&Contact> {
        self.profile.as_ref()
    }

    /// Returns the known contacts.
    #[must_use]
    pub const fn contacts(&self) -> &IdentitySet<Contact> {
        &self.contacts
    }

    /// Returns the chats from the latest chat refresh.
    #[must_use]
    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    /// Returns when the last full refresh completed.
    #[must_use]
    pub const fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// Merges the draft's profile and contacts.
    ///
    /// A profile already present among contacts keeps its stored
    /// representation.
    pub fn commit_profile(&mut self, draft: &RefreshDraft) {
        self.commit_contacts(draft);
        if let Some(profile) = draft.profile() {
            self.profile = Some(self.contacts.get_or_insert(profile.clone()));
        }
    }

    /// Merges the draft's contacts without removing existing ones.
    pub fn commit_contacts(&mut self, draft: &RefreshDraft) {
        self.contacts.extend(draft.contacts().iter().cloned());
    }

    /// Replaces the chat list with the draft's chats.
    pub fn commit_chats(&mut self, draft: &RefreshDraft) {
        self.chats = draft.chats().to_vec();
    }

    /// Commits every part of the draft and stamps the refresh time.
    pub fn commit_all(&mut self, draft: &RefreshDraft, refreshed_at: DateTime<Utc>) {
        self.commit_profile(draft);
        self.commit_chats(draft);
        self.refreshed_at = Some(refreshed_at);
    }
}

/// Results gathered by one refresh before they are committed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshDraft {
    profile: Option<Contact>,
    contacts: IdentitySet<Contact>,
    chats: Vec<Chat>,
    omitted_chats: Vec<PeerId>,
}

impl RefreshDraft {
    /// Creates an empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the profile, adding it to contacts when absent.
    pub fn record_profile(&mut self, profile: Contact) {
        self.profile = Some(self.contacts.get_or_insert(profile));
    }

    /// Records a contact; returns `false` for an identity already recorded.
    pub fn record_contact(&mut self, contact: Contact) -> bool {
        self.contacts.insert(contact)
    }

    /// Appends a chat.
    pub fn record_chat(&mut self, chat: Chat) {
        self.chats.push(chat);
    }

    /// Notes a chat that could not be fetched.
    pub fn record_omitted_chat(&mut self, peer: PeerId) {
        self.omitted_chats.push(peer);
    }

    /// Returns the recorded profile.
    #[must_use]
    pub const fn profile(&self) -> Option<&Contact> {
        self.profile.as_ref()
    }

    /// Returns the recorded contacts.
    #[must_use]
    pub const fn contacts(&self) -> &IdentitySet<Contact> {
        &self.contacts
    }

    /// Returns the recorded chats.
    #[must_use]
    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    /// Returns chats dropped after a failed lookup.
    #[must_use]
    pub fn omitted_chats(&self) -> &[PeerId] {
        &self.omitted_chats
    }
}
