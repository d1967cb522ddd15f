use std::time::{Duration, Instant};

/// The single one-shot deadline that ends a step's response window.
///
/// Arming replaces any pending deadline, so at most one window is ever open.
/// The timer is plain data owned by its session: cancelling it, or dropping
/// the session, guarantees no further step fires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepTimer {
    deadline: Option<Instant>,
}

impl StepTimer {
    pub fn arm(&mut self, deadline: Instant) {
        self.deadline = Some(deadline);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Disarms and returns true once `now` has reached the deadline.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
