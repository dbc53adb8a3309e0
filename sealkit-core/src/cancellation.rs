//! Cooperative cancellation for in-flight authentication attempts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation token for one authentication attempt.
///
/// Cloning shares the underlying state: cancelling any clone cancels the
/// attempt. Cancellation is cooperative and silent. Once signalled, no
/// outcome callback fires for that attempt, but a cipher operation already
/// executing is not forcibly terminated.
#[derive(Debug, Clone, Default)]
pub struct CancellationSignal {
    cancelled: Arc<AtomicBool>,
}

impl CancellationSignal {
    /// Creates a new, unsignalled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called on any
    /// clone of this token.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_shared_across_clones() {
        let signal = CancellationSignal::new();
        let clone = signal.clone();

        assert!(!signal.is_cancelled());
        assert!(!clone.is_cancelled());

        clone.cancel();
        assert!(signal.is_cancelled());
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let signal = CancellationSignal::new();
        signal.cancel();
        signal.cancel();
        assert!(signal.is_cancelled());
    }
}
