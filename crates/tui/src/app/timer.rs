use crate::app::state::ProgressTick;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmedTimer {
    pub generation: u64,
    pub tick: ProgressTick,
    pub deadline: Instant,
}

/// Single-slot cancellable timer driven by the main loop's clock.
///
/// Arming replaces whatever was pending, so at most one progress callback is
/// ever live.
#[derive(Debug, Default)]
pub struct ProgressTimer {
    armed: Option<ArmedTimer>,
}

impl ProgressTimer {
    pub fn arm(&mut self, generation: u64, tick: ProgressTick, deadline: Instant) {
        self.armed = Some(ArmedTimer {
            generation,
            tick,
            deadline,
        });
    }

    /// Safe to call when nothing is armed.
    pub fn cancel(&mut self) {
        self.armed = None;
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.armed.map(|armed| armed.deadline)
    }

    pub fn take_due(&mut self, now: Instant) -> Option<ArmedTimer> {
        match self.armed {
            Some(armed) if armed.deadline <= now => self.armed.take(),
            _ => None,
        }
    }
}
