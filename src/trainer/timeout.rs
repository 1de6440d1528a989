use std::time::{Duration, Instant};

/// Single-shot countdown checked cooperatively by whoever owns it.
///
/// Only one deadline exists at a time: starting again replaces the old
/// one, so a restarted countdown can never fire early.
#[derive(Clone, Debug)]
pub struct PendingTimeout {
    duration: Duration,
    deadline: Option<Instant>,
}

impl PendingTimeout {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            deadline: None,
        }
    }

    /// Start the countdown from `now`, replacing any running one
    pub fn restart(&mut self, now: Instant) {
        self.deadline = Some(now + self.duration);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn has_expired(&self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }

    /// Consume the deadline if it has passed. Fires at most once per start.
    pub fn fire(&mut self, now: Instant) -> bool {
        if self.has_expired(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Change the countdown length; a running countdown keeps its deadline
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}
