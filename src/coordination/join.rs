//! Join-all coordinator over a fixed set of named operations.

use super::{CompletionSignal, CoordinationResult, CountingBarrier, Outcome};
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

type Initiator<E> = Box<dyn FnOnce(Arrival<E>) + Send>;

#[derive(Debug)]
struct MemberRecord<E> {
    name: String,
    outcome: Option<Outcome<E>>,
}

type MemberTable<E> = Arc<Mutex<Vec<MemberRecord<E>>>>;

fn lock_members<E>(members: &MemberTable<E>) -> MutexGuard<'_, Vec<MemberRecord<E>>> {
    members.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Waits for every member of a fixed, known-in-advance set of operations.
///
/// Each member is registered with an initiator. [`perform`](Self::perform)
/// calls every initiator with an [`Arrival`] handle; the operation reports
/// back through that handle exactly once, whether it succeeded or not. The
/// coordinator counts arrivals, not successes. Member names exist for
/// inspection only.
///
/// # Examples
///
/// ```
/// use parley::coordination::JoinAll;
///
/// let handle = JoinAll::<String>::new()
///     .member("first", |arrival| arrival.arrive())
///     .member("second", |arrival| arrival.arrive())
///     .perform();
///
/// assert_eq!(handle.outcome(), Some(Ok(())));
/// ```
pub struct JoinAll<E> {
    members: Vec<(String, Initiator<E>)>,
}

impl<E> fmt::Debug for JoinAll<E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.members.iter().map(|(name, _)| name.as_str()).collect();
        formatter
            .debug_struct("JoinAll")
            .field("members", &names)
            .finish()
    }
}

impl<E> Default for JoinAll<E> {
    fn default() -> Self {
        Self {
            members: Vec::new(),
        }
    }
}

impl<E> JoinAll<E>
where
    E: Clone + Send + 'static,
{
    /// Creates a coordinator with no members.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a named member operation.
    #[must_use]
    pub fn member(
        mut self,
        name: impl Into<String>,
        initiator: impl FnOnce(Arrival<E>) + Send + 'static,
    ) -> Self {
        self.members.push((name.into(), Box::new(initiator)));
        self
    }

    /// Returns the number of registered members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns whether no members are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Starts every member operation.
    ///
    /// Consumes the coordinator: a join is performed once. With no members
    /// the returned handle has already completed. Members are started in
    /// registration order; once one aborts, the rest are never started.
    #[must_use]
    pub fn perform(self) -> JoinAllHandle<E> {
        let barrier = CountingBarrier::with_expected(self.members.len());
        let (records, initiators): (Vec<_>, Vec<_>) = self
            .members
            .into_iter()
            .map(|(name, initiator)| {
                (
                    MemberRecord {
                        name,
                        outcome: None,
                    },
                    initiator,
                )
            })
            .unzip();
        let members: MemberTable<E> = Arc::new(Mutex::new(records));
        let handle = JoinAllHandle {
            barrier: barrier.clone(),
            members: Arc::clone(&members),
        };

        for (slot, initiator) in initiators.into_iter().enumerate() {
            if barrier.is_complete() {
                debug!(slot, "join already failed; remaining members not started");
                break;
            }
            initiator(Arrival {
                slot,
                barrier: barrier.clone(),
                members: Arc::clone(&members),
            });
        }
        handle
    }
}

/// Single-use handle through which a member operation reports arrival.
pub struct Arrival<E> {
    slot: usize,
    barrier: CountingBarrier<E>,
    members: MemberTable<E>,
}

impl<E> fmt::Debug for Arrival<E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Arrival")
            .field("slot", &self.slot)
            .finish_non_exhaustive()
    }
}

impl<E> Arrival<E>
where
    E: Clone + Send + 'static,
{
    /// Returns the member name this handle reports for.
    #[must_use]
    pub fn name(&self) -> String {
        lock_members(&self.members)
            .get(self.slot)
            .map(|record| record.name.clone())
            .unwrap_or_default()
    }

    /// Reports a successful arrival.
    pub fn arrive(self) {
        self.arrive_with(Ok(()));
    }

    /// Reports arrival with the member's own outcome.
    ///
    /// The outcome is recorded for inspection; the join still counts this
    /// member as arrived when `outcome` is an error.
    pub fn arrive_with(self, outcome: Outcome<E>) {
        self.record(outcome);
        if let Err(error) = self.barrier.arrive() {
            warn!(%error, slot = self.slot, "join member arrived more than once");
        }
    }

    /// Reports a fatal failure and forces the whole join to fail.
    pub fn abort(self, error: E) {
        self.record(Err(error.clone()));
        if !self.barrier.fail(error) {
            debug!(slot = self.slot, "join had already completed before abort");
        }
    }

    fn record(&self, outcome: Outcome<E>) {
        if let Some(record) = lock_members(&self.members).get_mut(self.slot) {
            record.outcome = Some(outcome);
        }
    }
}

/// Observation handle returned by [`JoinAll::perform`].
pub struct JoinAllHandle<E> {
    barrier: CountingBarrier<E>,
    members: MemberTable<E>,
}

impl<E> Clone for JoinAllHandle<E> {
    fn clone(&self) -> Self {
        Self {
            barrier: self.barrier.clone(),
            members: Arc::clone(&self.members),
        }
    }
}

impl<E> fmt::Debug for JoinAllHandle<E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("JoinAllHandle")
            .field("barrier", &self.barrier)
            .finish_non_exhaustive()
    }
}

impl<E> JoinAllHandle<E>
where
    E: Clone + Send + 'static,
{
    /// Attaches a reaction to the join's completion signal.
    pub fn on_complete(&self, reaction: impl FnOnce(Outcome<E>) + Send + 'static) {
        self.barrier.on_complete(reaction);
    }

    /// Returns a future resolving with the join's outcome.
    pub fn wait(&self) -> impl Future<Output = CoordinationResult<Outcome<E>>> + Send + use<E> {
        self.barrier.wait()
    }

    /// Returns the join's outcome once it has fired.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome<E>> {
        self.barrier.outcome()
    }

    /// Returns a handle to the join's completion signal.
    #[must_use]
    pub fn signal(&self) -> CompletionSignal<Outcome<E>> {
        self.barrier.signal()
    }

    /// Returns the recorded outcome of the first member called `name`.
    #[must_use]
    pub fn member_outcome(&self, name: &str) -> Option<Outcome<E>> {
        lock_members(&self.members)
            .iter()
            .find(|record| record.name == name)
            .and_then(|record| record.outcome.clone())
    }

    /// Returns the names of members that have not reported yet.
    #[must_use]
    pub fn pending_members(&self) -> Vec<String> {
        lock_members(&self.members)
            .iter()
            .filter(|record| record.outcome.is_none())
            .map(|record| record.name.clone())
            .collect()
    }

    /// Returns the number of members that have arrived.
    #[must_use]
    pub fn arrived(&self) -> usize {
        self.barrier.arrived()
    }
}
