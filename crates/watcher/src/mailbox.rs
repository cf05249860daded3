//! Single-slot deferred-action cell

use parking_lot::Mutex;

/// Single-capacity mailbox with overwrite-on-post semantics
///
/// The writer side (notification thread) posts; the reader side (drain
/// loop) takes once per tick. Bursts of posts between drains collapse
/// to the most recent value, so N events within one tick interval
/// produce at most one unit of work.
pub struct Mailbox<T> {
    slot: Mutex<Option<T>>,
}

impl<T> Mailbox<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Post a value, replacing any pending one
    ///
    /// Returns whether a pending value was discarded.
    pub fn post(&self, value: T) -> bool {
        self.slot.lock().replace(value).is_some()
    }

    /// Take the pending value, leaving the slot empty
    pub fn take(&self) -> Option<T> {
        self.slot.lock().take()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.lock().is_none()
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}
