use serde::{Deserialize, Serialize};

/// Identifies one scheduled timer; a rescheduled timer gets a new handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingTimer<T> {
    handle: TimerHandle,
    due_ms: f64,
    payload: T,
}

/// Single-slot trailing-edge timer driven by host ticks.
///
/// Scheduling replaces whatever was pending, so only the last payload within
/// the window survives.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DebounceTimer<T> {
    pending: Option<PendingTimer<T>>,
    next_handle: u64,
}

impl<T> Default for DebounceTimer<T> {
    fn default() -> Self {
        Self {
            pending: None,
            next_handle: 0,
        }
    }
}

impl<T: Copy> DebounceTimer<T> {
    pub(crate) fn schedule(&mut self, now_ms: f64, delay_ms: f64, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.pending = Some(PendingTimer {
            handle,
            due_ms: now_ms + delay_ms,
            payload,
        });
        handle
    }

    /// Returns `true` when a pending timer was dropped.
    pub(crate) fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    #[must_use]
    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub(crate) fn pending_handle(&self) -> Option<TimerHandle> {
        self.pending.map(|timer| timer.handle)
    }

    /// Takes the payload once `now_ms` reaches the due time.
    pub(crate) fn take_due(&mut self, now_ms: f64) -> Option<T> {
        match self.pending {
            Some(timer) if now_ms >= timer.due_ms => {
                self.pending = None;
                Some(timer.payload)
            }
            _ => None,
        }
    }
}
