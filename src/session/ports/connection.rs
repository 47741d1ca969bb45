//! Connection-state port.

/// Reports whether the transport can currently carry requests.
///
/// Polled synchronously before every request is issued.
#[cfg_attr(test, mockall::automock)]
pub trait ConnectionState: Send + Sync {
    /// Returns `true` when requests may be sent.
    fn is_usable(&self) -> bool;
}
