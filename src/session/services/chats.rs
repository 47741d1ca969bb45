//! Chat refresh: dialog list followed by a lazily sized `chat_info` fan-out.

use super::ChatInfoFailurePolicy;
use super::context::{
    PartSignal, RefreshContext, SharedDraft, expect_sequence, expect_success, lock_draft,
};
use super::{RefreshError, RefreshResult};
use crate::coordination::CountingBarrier;
use crate::session::domain::{Chat, PeerDescriptor, PeerKind, RefreshId};
use crate::session::ports::{ConnectionState, Reply, Request, Transport};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, warn};

type FanOut = CountingBarrier<RefreshError>;

impl<T, N, C> RefreshContext<T, N, C>
where
    T: Transport + 'static,
    N: ConnectionState + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Fetches the dialog list and every group chat it names.
    ///
    /// Direct dialogs become chats immediately. Group dialogs each need a
    /// `chat_info` reply, and their number is only known once the dialog list
    /// arrives, so the barrier is sized at that point. An empty batch
    /// completes as soon as it is sized.
    pub(super) fn fetch_chats(
        self: &Arc<Self>,
        refresh_id: RefreshId,
        draft: &SharedDraft,
    ) -> PartSignal {
        let fan_out = FanOut::new();
        if let Err(error) = self.ensure_connected() {
            fan_out.fail(error);
            return fan_out.signal();
        }

        let command = self.config.commands.dialogs.clone();
        let context = Arc::clone(self);
        let reply_draft = Arc::clone(draft);
        let reply_fan_out = fan_out.clone();
        self.transport.send(
            Request::new(command.as_str()),
            Box::new(move |reply| match parse_dialogs(&command, reply) {
                Ok(peers) => context.fan_out(refresh_id, &reply_draft, &reply_fan_out, peers),
                Err(error) => {
                    warn!(%refresh_id, %error, "dialog list refresh failed");
                    reply_fan_out.fail(error);
                }
            }),
        );
        fan_out.signal()
    }

    fn fan_out(
        &self,
        refresh_id: RefreshId,
        draft: &SharedDraft,
        fan_out: &FanOut,
        peers: Vec<PeerDescriptor>,
    ) {
        let mut groups = Vec::new();
        {
            let mut staged = lock_draft(draft);
            for peer in peers {
                match peer.kind() {
                    PeerKind::User => staged.record_chat(Chat::from_user_peer(&peer)),
                    PeerKind::Chat => groups.push(peer),
                    PeerKind::Other(tag) => {
                        debug!(%refresh_id, peer = %peer.id(), %tag, "skipping unsupported dialog");
                    }
                }
            }
        }

        debug!(%refresh_id, lookups = groups.len(), "dialog list received");
        if let Err(error) = fan_out.set_expected(groups.len()) {
            fan_out.fail(error.into());
            return;
        }

        for peer in groups {
            if let Err(error) = self.ensure_connected() {
                fan_out.fail(error);
                return;
            }
            self.request_chat_info(refresh_id, draft, fan_out, peer);
        }
    }

    fn request_chat_info(
        &self,
        refresh_id: RefreshId,
        draft: &SharedDraft,
        fan_out: &FanOut,
        peer: PeerDescriptor,
    ) {
        let command = self.config.commands.chat_info.clone();
        let request = Request::new(command.as_str()).with_arg(peer.id().as_str());
        let policy = self.config.chat_info_failure;
        let reply_draft = Arc::clone(draft);
        let reply_fan_out = fan_out.clone();
        self.transport.send(
            request,
            Box::new(move |reply| {
                let fetched = expect_success(&command, reply).and_then(|payload| {
                    Chat::from_chat_info(&peer, &payload)
                        .map_err(|error| RefreshError::upstream(command.as_str(), error))
                });

                match fetched {
                    Ok(chat) => {
                        lock_draft(&reply_draft).record_chat(chat);
                    }
                    Err(error) if policy == ChatInfoFailurePolicy::Omit => {
                        warn!(
                            %refresh_id,
                            peer = %peer.id(),
                            %error,
                            "omitting chat after failed lookup"
                        );
                        lock_draft(&reply_draft).record_omitted_chat(peer.id().clone());
                    }
                    Err(error) => {
                        reply_fan_out.fail(RefreshError::ChatInfoFailed {
                            peer: peer.id().clone(),
                            reason: error.to_string(),
                        });
                        return;
                    }
                }

                if let Err(error) = reply_fan_out.arrive() {
                    warn!(%refresh_id, %error, "chat lookup arrived after the batch completed");
                }
            }),
        );
    }
}

fn parse_dialogs(command: &str, reply: Reply) -> RefreshResult<Vec<PeerDescriptor>> {
    expect_success(command, reply)
        .and_then(|payload| expect_sequence(command, payload))?
        .iter()
        .map(PeerDescriptor::from_payload)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|error| RefreshError::upstream(command, error))
}
