use std::time::{Duration, Instant};

pub const DEFAULT_PROGRESS_LABEL: &str = "Processing...";
pub const DEFAULT_PROGRESS_DURATION: Duration = Duration::from_millis(1000);
/// Time the bar sits at 0% before the fill animation starts.
pub const PROGRESS_BASELINE_DELAY: Duration = Duration::from_millis(10);
/// Extra time after `duration` before the overlay auto-hides.
pub const PROGRESS_GRACE: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressPhase {
    Idle,
    Baseline {
        started_at: Instant,
    },
    Filling {
        started_at: Instant,
        fill_started_at: Instant,
    },
}

/// Scheduled steps of a progress cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressTick {
    BeginFill,
    AutoEnd,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressState {
    pub label: String,
    pub duration: Duration,
    pub phase: ProgressPhase,
    /// Bumped on every start and end so timers armed for an older cycle are
    /// recognisable when they fire.
    pub generation: u64,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            label: String::new(),
            duration: DEFAULT_PROGRESS_DURATION,
            phase: ProgressPhase::Idle,
            generation: 0,
        }
    }
}

impl ProgressState {
    pub fn running(&self) -> bool {
        self.phase != ProgressPhase::Idle
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, ProgressPhase::Filling { .. })
    }

    pub fn started_at(&self) -> Option<Instant> {
        match self.phase {
            ProgressPhase::Idle => None,
            ProgressPhase::Baseline { started_at } | ProgressPhase::Filling { started_at, .. } => {
                Some(started_at)
            }
        }
    }

    pub fn auto_end_at(&self) -> Option<Instant> {
        self.started_at()
            .map(|started_at| started_at + self.duration + PROGRESS_GRACE)
    }

    /// Linear fill in `0.0..=1.0`.
    pub fn fill_ratio(&self, now: Instant) -> f64 {
        match self.phase {
            ProgressPhase::Idle | ProgressPhase::Baseline { .. } => 0.0,
            ProgressPhase::Filling {
                fill_started_at, ..
            } => {
                if self.duration.is_zero() {
                    return 1.0;
                }
                let elapsed = now.saturating_duration_since(fill_started_at);
                (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_is_zero_until_the_fill_phase() {
        let now = Instant::now();
        let mut progress = ProgressState {
            label: "Loading".to_string(),
            duration: Duration::from_millis(500),
            phase: ProgressPhase::Baseline { started_at: now },
            generation: 1,
        };
        assert!(progress.running());
        assert!(!progress.is_animating());
        assert_eq!(progress.fill_ratio(now + Duration::from_millis(300)), 0.0);

        progress.phase = ProgressPhase::Filling {
            started_at: now,
            fill_started_at: now + PROGRESS_BASELINE_DELAY,
        };
        let halfway = now + PROGRESS_BASELINE_DELAY + Duration::from_millis(250);
        assert!((progress.fill_ratio(halfway) - 0.5).abs() < 1e-9);
        assert_eq!(progress.fill_ratio(now + Duration::from_secs(5)), 1.0);
    }

    #[test]
    fn zero_duration_fills_immediately() {
        let now = Instant::now();
        let progress = ProgressState {
            label: String::new(),
            duration: Duration::ZERO,
            phase: ProgressPhase::Filling {
                started_at: now,
                fill_started_at: now,
            },
            generation: 1,
        };
        assert_eq!(progress.fill_ratio(now), 1.0);
    }

    #[test]
    fn auto_end_includes_grace_period() {
        let now = Instant::now();
        let progress = ProgressState {
            label: String::new(),
            duration: Duration::from_millis(500),
            phase: ProgressPhase::Baseline { started_at: now },
            generation: 1,
        };
        assert_eq!(
            progress.auto_end_at(),
            Some(now + Duration::from_millis(550))
        );
        assert_eq!(ProgressState::default().auto_end_at(), None);
    }
}
