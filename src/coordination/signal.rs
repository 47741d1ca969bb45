//! Single-fire completion signal with late-attach reactions.

use super::{CoordinationError, CoordinationResult};
use std::fmt;
use std::future::Future;
use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;
use tracing::debug;

type Reaction<T> = Box<dyn FnOnce(T) + Send>;

enum SignalState<T> {
    Pending(Vec<Reaction<T>>),
    Fired(T),
}

/// A single-fire event with one observable outcome.
///
/// Clones share the same underlying state. Reactions attached before the
/// signal fires run once, in attach order, when [`fire`](Self::fire) is
/// called. Reactions attached afterwards run immediately with the stored
/// outcome. No lock is held while a reaction runs, so a reaction may attach
/// further reactions or fire other signals.
pub struct CompletionSignal<T> {
    state: Arc<Mutex<SignalState<T>>>,
}

impl<T> Clone for CompletionSignal<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Default for CompletionSignal<T> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(SignalState::Pending(Vec::new()))),
        }
    }
}

impl<T> fmt::Debug for CompletionSignal<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fired = matches!(*self.lock(), SignalState::Fired(_));
        formatter
            .debug_struct("CompletionSignal")
            .field("fired", &fired)
            .finish()
    }
}

impl<T> CompletionSignal<T> {
    fn lock(&self) -> MutexGuard<'_, SignalState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns whether the signal has fired.
    #[must_use]
    pub fn is_fired(&self) -> bool {
        matches!(*self.lock(), SignalState::Fired(_))
    }
}

impl<T> CompletionSignal<T>
where
    T: Clone + Send + 'static,
{
    /// Creates a pending signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the signal and runs every pending reaction in attach order.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinationError::DoubleFire`] when the signal has already
    /// fired. The stored outcome is left untouched in that case.
    pub fn fire(&self, outcome: T) -> CoordinationResult<()> {
        let reactions = {
            let mut state = self.lock();
            if matches!(*state, SignalState::Fired(_)) {
                return Err(CoordinationError::DoubleFire);
            }
            match mem::replace(&mut *state, SignalState::Fired(outcome.clone())) {
                SignalState::Pending(reactions) => reactions,
                SignalState::Fired(_) => Vec::new(),
            }
        };

        for reaction in reactions {
            reaction(outcome.clone());
        }
        Ok(())
    }

    /// Attaches a reaction.
    ///
    /// Runs immediately with the stored outcome when the signal has already
    /// fired; otherwise runs once when it fires.
    pub fn on_complete(&self, reaction: impl FnOnce(T) + Send + 'static) {
        let fired_outcome = {
            let mut state = self.lock();
            match &mut *state {
                SignalState::Pending(reactions) => {
                    reactions.push(Box::new(reaction));
                    return;
                }
                SignalState::Fired(outcome) => outcome.clone(),
            }
        };
        reaction(fired_outcome);
    }

    /// Returns the outcome if the signal has fired.
    #[must_use]
    pub fn outcome(&self) -> Option<T> {
        match &*self.lock() {
            SignalState::Fired(outcome) => Some(outcome.clone()),
            SignalState::Pending(_) => None,
        }
    }

    /// Returns a future that resolves with the outcome once the signal fires.
    ///
    /// The future resolves to [`CoordinationError::SignalAbandoned`] when
    /// every handle to the signal is dropped before it fires.
    pub fn wait(&self) -> impl Future<Output = CoordinationResult<T>> + Send + use<T> {
        let (sender, receiver) = oneshot::channel();
        self.on_complete(move |outcome| {
            if sender.send(outcome).is_err() {
                debug!("signal waiter dropped before completion");
            }
        });
        async move {
            receiver
                .await
                .map_err(|_| CoordinationError::SignalAbandoned)
        }
    }
}
