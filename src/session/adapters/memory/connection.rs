//! Atomic connection-state flag.

use crate::session::ports::ConnectionState;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Connection state backed by a shared atomic flag.
#[derive(Debug, Clone, Default)]
pub struct ConnectionFlag {
    usable: Arc<AtomicBool>,
}

impl ConnectionFlag {
    /// Creates a flag that reports the connection as usable.
    #[must_use]
    pub fn connected() -> Self {
        Self {
            usable: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Creates a flag that reports the connection as unusable.
    #[must_use]
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Updates the reported state.
    pub fn set_usable(&self, usable: bool) {
        self.usable.store(usable, Ordering::SeqCst);
    }
}

impl ConnectionState for ConnectionFlag {
    fn is_usable(&self) -> bool {
        self.usable.load(Ordering::SeqCst)
    }
}
