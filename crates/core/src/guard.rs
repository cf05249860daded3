//! Re-entrancy guard for compression passes

use std::sync::atomic::{AtomicBool, Ordering};

/// Single shared "pass in progress" flag
///
/// Not a queue and not a reentrant lock: a caller that fails `try_enter`
/// must abort its operation. Extraction and deletion only observe the
/// flag via `is_held`; they never hold it.
#[derive(Debug, Default)]
pub struct RunGuard {
    active: AtomicBool,
}

impl RunGuard {
    pub fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
        }
    }

    /// Atomically observe and set the flag
    ///
    /// Returns `None` when a pass is already running. The returned permit
    /// clears the flag on drop, so the release happens even when the
    /// guarded operation fails.
    pub fn try_enter(&self) -> Option<RunPermit<'_>> {
        self.active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| RunPermit { guard: self })
    }

    /// Whether a pass is currently in flight
    pub fn is_held(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

/// Scoped acquisition of [`RunGuard`]
#[must_use = "dropping the permit releases the guard immediately"]
pub struct RunPermit<'a> {
    guard: &'a RunGuard,
}

impl Drop for RunPermit<'_> {
    fn drop(&mut self) {
        self.guard.active.store(false, Ordering::SeqCst);
    }
}
