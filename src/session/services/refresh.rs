//! Session refresh orchestration.

use super::context::{
    PartSignal, RefreshContext, SharedDraft, expect_sequence, expect_success, lock_draft, settle,
};
use super::{RefreshConfig, RefreshError, RefreshResult, RefreshScope, RefreshSummary};
use crate::coordination::{Arrival, CompletionSignal, JoinAll};
use crate::session::domain::{Contact, RefreshDraft, RefreshId, SessionState};
use crate::session::ports::{ConnectionState, Request, Transport};
use mockable::Clock;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Signal carrying the final result of a refresh.
pub type RefreshSignal = CompletionSignal<RefreshResult<RefreshSummary>>;

const PROFILE_MEMBER: &str = "refresh_profile";
const CONTACTS_MEMBER: &str = "refresh_contacts";
const CHATS_MEMBER: &str = "refresh_chats";

/// Refreshes session state from the daemon and reports completion.
///
/// Every public operation returns as soon as its first requests are issued.
/// Results are staged in a private draft and committed to the session only
/// when the whole operation succeeds, so a failed refresh leaves the session
/// exactly as it was. The continuation passed to an operation, and any
/// reaction attached to the returned [`RefreshSignal`], runs once with the
/// final result.
pub struct SessionRefreshService<T, N, C> {
    context: Arc<RefreshContext<T, N, C>>,
}

impl<T, N, C> Clone for SessionRefreshService<T, N, C> {
    fn clone(&self) -> Self {
        Self {
            context: Arc::clone(&self.context),
        }
    }
}

impl<T, N, C> SessionRefreshService<T, N, C>
where
    T: Transport + 'static,
    N: ConnectionState + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a service with the default configuration.
    #[must_use]
    pub fn new(transport: Arc<T>, connection: Arc<N>, clock: Arc<C>) -> Self {
        Self::with_config(transport, connection, clock, RefreshConfig::default())
    }

    /// Creates a service with an explicit configuration.
    #[must_use]
    pub fn with_config(
        transport: Arc<T>,
        connection: Arc<N>,
        clock: Arc<C>,
        config: RefreshConfig,
    ) -> Self {
        Self {
            context: Arc::new(RefreshContext {
                transport,
                connection,
                clock,
                config,
                state: Mutex::new(SessionState::new()),
            }),
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &RefreshConfig {
        &self.context.config
    }

    /// Returns a copy of the current session state.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.context.lock_state().clone()
    }

    /// Refreshes profile, contacts, and chats concurrently.
    ///
    /// `on_done` runs once after all three parts have arrived and the session
    /// has been updated, or once with the first fatal error.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::NotConnected`] when the connection is not
    /// usable before any part has been started, or when a part finds it
    /// unusable while the refresh is being started. `on_done` is not called
    /// in that case, and parts not yet started are never started.
    pub fn refresh_all(
        &self,
        on_done: impl FnOnce(RefreshResult<RefreshSummary>) + Send + 'static,
    ) -> RefreshResult<RefreshSignal> {
        self.run(RefreshScope::All, on_done, |context, refresh_id, draft| {
            JoinAll::new()
                .member(
                    PROFILE_MEMBER,
                    member(context, refresh_id, draft, RefreshContext::fetch_profile),
                )
                .member(
                    CONTACTS_MEMBER,
                    member(context, refresh_id, draft, RefreshContext::fetch_contacts),
                )
                .member(
                    CHATS_MEMBER,
                    member(context, refresh_id, draft, RefreshContext::fetch_chats),
                )
                .perform()
                .signal()
        })
    }

    /// Refreshes the signed-in profile.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::NotConnected`] when the connection is not
    /// usable.
    pub fn refresh_profile(
        &self,
        on_done: impl FnOnce(RefreshResult<RefreshSummary>) + Send + 'static,
    ) -> RefreshResult<RefreshSignal> {
        self.run(RefreshScope::Profile, on_done, RefreshContext::fetch_profile)
    }

    /// Refreshes the contact list.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::NotConnected`] when the connection is not
    /// usable.
    pub fn refresh_contacts(
        &self,
        on_done: impl FnOnce(RefreshResult<RefreshSummary>) + Send + 'static,
    ) -> RefreshResult<RefreshSignal> {
        self.run(RefreshScope::Contacts, on_done, RefreshContext::fetch_contacts)
    }

    /// Refreshes the chat list, fanning out one `chat_info` request per
    /// group dialog.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::NotConnected`] when the connection is not
    /// usable.
    pub fn refresh_chats(
        &self,
        on_done: impl FnOnce(RefreshResult<RefreshSummary>) + Send + 'static,
    ) -> RefreshResult<RefreshSignal> {
        self.run(RefreshScope::Chats, on_done, RefreshContext::fetch_chats)
    }

    fn run<F>(
        &self,
        scope: RefreshScope,
        on_done: impl FnOnce(RefreshResult<RefreshSummary>) + Send + 'static,
        start: F,
    ) -> RefreshResult<RefreshSignal>
    where
        F: FnOnce(&Arc<RefreshContext<T, N, C>>, RefreshId, &SharedDraft) -> PartSignal,
    {
        self.context.ensure_connected()?;

        let refresh_id = RefreshId::new();
        info!(%refresh_id, %scope, "starting session refresh");

        let draft = SharedDraft::default();
        let parts = start(&self.context, refresh_id, &draft);
        if let Some(Err(RefreshError::NotConnected)) = parts.outcome() {
            warn!(%refresh_id, %scope, "connection lost while starting refresh");
            return Err(RefreshError::NotConnected);
        }

        let result = RefreshSignal::new();
        result.on_complete(on_done);

        let context = Arc::clone(&self.context);
        let settled = result.clone();
        parts.on_complete(move |outcome| {
            let summary = outcome.map(|()| context.commit(refresh_id, scope, &draft));
            match &summary {
                Ok(report) => info!(
                    %refresh_id,
                    %scope,
                    contacts = report.contacts,
                    chats = report.chats,
                    omitted_chats = report.omitted_chats.len(),
                    "session refresh completed"
                ),
                Err(error) => warn!(
                    %refresh_id,
                    %scope,
                    %error,
                    "session refresh failed; staged results discarded"
                ),
            }
            if let Err(error) = settled.fire(summary) {
                warn!(%refresh_id, %error, "refresh result reported twice");
            }
        });

        Ok(result)
    }
}

/// Adapts a refresh part into a join member.
fn member<T, N, C, F>(
    context: &Arc<RefreshContext<T, N, C>>,
    refresh_id: RefreshId,
    draft: &SharedDraft,
    fetch: F,
) -> impl FnOnce(Arrival<RefreshError>) + Send + 'static + use<T, N, C, F>
where
    T: Send + Sync + 'static,
    N: Send + Sync + 'static,
    C: Send + Sync + 'static,
    F: FnOnce(&Arc<RefreshContext<T, N, C>>, RefreshId, &SharedDraft) -> PartSignal
        + Send
        + 'static,
{
    let shared_context = Arc::clone(context);
    let shared_draft = Arc::clone(draft);
    move |arrival| {
        fetch(&shared_context, refresh_id, &shared_draft).on_complete(move |outcome| {
            match outcome {
                Ok(()) => arrival.arrive(),
                Err(error) => arrival.abort(error),
            }
        });
    }
}

impl<T, N, C> RefreshContext<T, N, C>
where
    T: Transport + 'static,
    N: ConnectionState + 'static,
    C: Clock + Send + Sync + 'static,
{
    pub(super) fn fetch_profile(
        self: &Arc<Self>,
        refresh_id: RefreshId,
        draft: &SharedDraft,
    ) -> PartSignal {
        let signal = PartSignal::new();
        if let Err(error) = self.ensure_connected() {
            settle(&signal, Err(error));
            return signal;
        }

        let command = self.config.commands.profile.clone();
        let request = Request::new(command.as_str());
        let reply_signal = signal.clone();
        let reply_draft = Arc::clone(draft);
        self.transport.send(
            request,
            Box::new(move |reply| {
                let outcome = expect_success(&command, reply).and_then(|payload| {
                    Contact::from_payload(&payload)
                        .map_err(|error| RefreshError::upstream(command.as_str(), error))
                });
                let recorded = outcome.map(|profile| {
                    debug!(%refresh_id, profile = %profile.id(), "profile received");
                    lock_draft(&reply_draft).record_profile(profile);
                });
                settle(&reply_signal, recorded);
            }),
        );
        signal
    }

    pub(super) fn fetch_contacts(
        self: &Arc<Self>,
        refresh_id: RefreshId,
        draft: &SharedDraft,
    ) -> PartSignal {
        let signal = PartSignal::new();
        if let Err(error) = self.ensure_connected() {
            settle(&signal, Err(error));
            return signal;
        }

        let command = self.config.commands.contacts.clone();
        let request = Request::new(command.as_str());
        let reply_signal = signal.clone();
        let reply_draft = Arc::clone(draft);
        self.transport.send(
            request,
            Box::new(move |reply| {
                let parsed = expect_success(&command, reply)
                    .and_then(|payload| expect_sequence(&command, payload))
                    .and_then(|entries| {
                        entries
                            .iter()
                            .map(Contact::from_payload)
                            .collect::<Result<Vec<_>, _>>()
                            .map_err(|error| RefreshError::upstream(command.as_str(), error))
                    });
                let recorded = parsed.map(|contacts| {
                    let received = contacts.len();
                    let mut staged = lock_draft(&reply_draft);
                    let added = contacts
                        .into_iter()
                        .map(|contact| staged.record_contact(contact))
                        .filter(|inserted| *inserted)
                        .count();
                    debug!(%refresh_id, received, added, "contact list received");
                });
                settle(&reply_signal, recorded);
            }),
        );
        signal
    }

    /// Commits the draft for `scope` and reports the resulting state.
    fn commit(
        &self,
        refresh_id: RefreshId,
        scope: RefreshScope,
        draft: &SharedDraft,
    ) -> RefreshSummary {
        let staged: RefreshDraft = lock_draft(draft).clone();
        let mut state = self.lock_state();
        match scope {
            RefreshScope::All => state.commit_all(&staged, self.clock.utc()),
            RefreshScope::Profile => state.commit_profile(&staged),
            RefreshScope::Contacts => state.commit_contacts(&staged),
            RefreshScope::Chats => state.commit_chats(&staged),
        }

        RefreshSummary {
            refresh_id,
            scope,
            refreshed_at: state.refreshed_at(),
            profile: state.profile().map(|profile| profile.id().clone()),
            contacts: state.contacts().len(),
            chats: state.chats().len(),
            omitted_chats: staged.omitted_chats().to_vec(),
        }
    }
}
