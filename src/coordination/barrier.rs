//! Counting barrier over a batch of asynchronous sub-operations.

use super::{CompletionSignal, CoordinationError, CoordinationResult, Outcome};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct BarrierState {
    expected: Option<usize>,
    arrived: usize,
    settled: bool,
    failed: bool,
}

impl BarrierState {
    /// Marks the barrier settled when every expected arrival is in.
    fn settle_if_complete(&mut self) -> bool {
        if self.settled || self.expected != Some(self.arrived) {
            return false;
        }
        self.settled = true;
        true
    }
}

/// Tracks "N expected, M arrived" and fires its signal when M reaches N.
///
/// The expected count may be supplied at construction
/// ([`with_expected`](Self::with_expected)) or later, once it is known
/// ([`set_expected`](Self::set_expected)). An expected count of zero fires
/// as soon as it is known. Arrival is counted, not success: the signal fires
/// with `Ok(())` once the count is reached. A fatal condition can be forced
/// through [`fail`](Self::fail); arrivals after that are ignored.
pub struct CountingBarrier<E> {
    state: Arc<Mutex<BarrierState>>,
    signal: CompletionSignal<Outcome<E>>,
}

impl<E> Clone for CountingBarrier<E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            signal: self.signal.clone(),
        }
    }
}

impl<E> std::fmt::Debug for CountingBarrier<E> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("CountingBarrier")
            .field("state", &*self.lock())
            .finish_non_exhaustive()
    }
}

impl<E> CountingBarrier<E> {
    fn lock(&self) -> MutexGuard<'_, BarrierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the expected count, if known.
    #[must_use]
    pub fn expected(&self) -> Option<usize> {
        self.lock().expected
    }

    /// Returns the number of recorded arrivals.
    #[must_use]
    pub fn arrived(&self) -> usize {
        self.lock().arrived
    }

    /// Returns whether the barrier has fired, successfully or not.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.lock().settled
    }
}

impl<E> CountingBarrier<E>
where
    E: Clone + Send + 'static,
{
    /// Creates a barrier whose expected count is not yet known.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(BarrierState::default())),
            signal: CompletionSignal::new(),
        }
    }

    /// Creates a barrier with the expected count fixed up front.
    ///
    /// A count of zero fires immediately.
    #[must_use]
    pub fn with_expected(expected: usize) -> Self {
        let settled = expected == 0;
        let barrier = Self {
            state: Arc::new(Mutex::new(BarrierState {
                expected: Some(expected),
                settled,
                ..BarrierState::default()
            })),
            signal: CompletionSignal::new(),
        };
        if settled {
            barrier.fire(Ok(()));
        }
        barrier
    }

    /// Records the expected count.
    ///
    /// Arrivals recorded before this call are kept. When they already match
    /// `expected` (including zero of zero), the barrier fires at once.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinationError::ExpectedAlreadySet`] on a second call and
    /// [`CoordinationError::Overflow`] when more arrivals than `expected`
    /// have already been recorded.
    pub fn set_expected(&self, expected: usize) -> CoordinationResult<()> {
        let should_fire = {
            let mut state = self.lock();
            if let Some(previous) = state.expected {
                return Err(CoordinationError::ExpectedAlreadySet { expected: previous });
            }
            if state.arrived > expected {
                return Err(CoordinationError::Overflow {
                    expected,
                    arrived: state.arrived,
                });
            }
            state.expected = Some(expected);
            state.settle_if_complete()
        };

        if should_fire {
            self.fire(Ok(()));
        }
        Ok(())
    }

    /// Records one arrival.
    ///
    /// Arrivals after a forced failure are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinationError::Overflow`] when the expected count has
    /// already been reached.
    pub fn arrive(&self) -> CoordinationResult<()> {
        let should_fire = {
            let mut state = self.lock();
            if state.failed {
                debug!(arrived = state.arrived, "ignoring arrival at failed barrier");
                return Ok(());
            }
            if let Some(expected) = state.expected.filter(|expected| state.arrived >= *expected) {
                return Err(CoordinationError::Overflow {
                    expected,
                    arrived: state.arrived + 1,
                });
            }
            state.arrived += 1;
            state.settle_if_complete()
        };

        if should_fire {
            self.fire(Ok(()));
        }
        Ok(())
    }

    /// Forces the barrier to fire with `error`.
    ///
    /// Returns `false` when the barrier had already fired.
    pub fn fail(&self, error: E) -> bool {
        {
            let mut state = self.lock();
            if state.settled {
                return false;
            }
            state.settled = true;
            state.failed = true;
        }
        self.fire(Err(error));
        true
    }

    /// Attaches a reaction to the barrier's signal.
    pub fn on_complete(&self, reaction: impl FnOnce(Outcome<E>) + Send + 'static) {
        self.signal.on_complete(reaction);
    }

    /// Returns a future resolving with the barrier's outcome.
    pub fn wait(
        &self,
    ) -> impl Future<Output = CoordinationResult<Outcome<E>>> + Send + use<E> {
        self.signal.wait()
    }

    /// Returns the barrier's outcome once it has fired.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome<E>> {
        self.signal.outcome()
    }

    /// Returns a handle to the underlying signal.
    #[must_use]
    pub fn signal(&self) -> CompletionSignal<Outcome<E>> {
        self.signal.clone()
    }

    fn fire(&self, outcome: Outcome<E>) {
        if let Err(error) = self.signal.fire(outcome) {
            warn!(%error, "barrier signal was fired outside the barrier");
        }
    }
}

impl<E> Default for CountingBarrier<E>
where
    E: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
