use std::time::{Duration, Instant};

/// How urgently an edit wants to be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Change {
    /// Property edits and other bursts; saved after a quiet period.
    Debounced,
    /// End of a drag, resize or structural edit; saved on the next tick.
    Immediate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    At(Instant),
    Now,
}

/// Single pending save with debounce.
///
/// Each debounced edit pushes the deadline out again; an immediate request
/// wins over any deadline. Nothing here runs on its own: the owner polls
/// [`take_due`](Self::take_due) from its event loop or timer.
#[derive(Debug, Clone)]
pub struct SaveScheduler {
    debounce: Duration,
    pending: Option<Pending>,
}

impl SaveScheduler {
    pub fn new(debounce: Duration) -> Self {
        Self { debounce, pending: None }
    }

    /// Request a save `debounce` after `now`, replacing an earlier deadline.
    pub fn schedule(&mut self, now: Instant) {
        if self.pending != Some(Pending::Now) {
            self.pending = Some(Pending::At(now + self.debounce));
        }
    }

    pub fn schedule_immediate(&mut self) {
        self.pending = Some(Pending::Now);
    }

    pub fn record(&mut self, change: Change, now: Instant) {
        match change {
            Change::Debounced => self.schedule(now),
            Change::Immediate => self.schedule_immediate(),
        }
    }

    /// Drop the pending save, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending save becomes due; `None` if nothing is pending.
    pub fn deadline(&self, now: Instant) -> Option<Instant> {
        match self.pending? {
            Pending::At(at) => Some(at),
            Pending::Now => Some(now),
        }
    }

    /// Consume the pending save if it is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> bool {
        let due = match self.pending {
            Some(Pending::Now) => true,
            Some(Pending::At(at)) => now >= at,
            None => false,
        };
        if due {
            self.pending = None;
        }
        due
    }

    /// Consume the pending save regardless of its deadline.
    pub fn take_any(&mut self) -> bool {
        self.pending.take().is_some()
    }
}
