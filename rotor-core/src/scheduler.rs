//! Single-shot, cancel-and-replace deferred actions.

use std::time::{Duration, Instant};

/// Holds at most one pending action with a deadline.
///
/// Scheduling while an action is pending replaces it: stale actions are
/// void, never queued. The owner polls with an explicit `now`, so the slot
/// needs no runtime and behaves deterministically under test.
#[derive(Debug, Clone)]
pub struct DeferredSlot<A> {
    pending: Option<Pending<A>>,
}

#[derive(Debug, Clone)]
struct Pending<A> {
    due: Instant,
    action: A,
}

impl<A> Default for DeferredSlot<A> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<A> DeferredSlot<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the slot to fire `delay` after `now`, returning any action that
    /// was displaced.
    pub fn schedule(&mut self, now: Instant, delay: Duration, action: A) -> Option<A> {
        let previous = self.pending.replace(Pending {
            due: now + delay,
            action,
        });
        previous.map(|p| p.action)
    }

    /// Disarm the slot, returning the action that will no longer fire.
    pub fn cancel(&mut self) -> Option<A> {
        self.pending.take().map(|p| p.action)
    }

    /// Take the action if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<A> {
        match &self.pending {
            Some(p) if p.due <= now => self.pending.take().map(|p| p.action),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }
}
