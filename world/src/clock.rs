//! Level countdown driven in whole-second ticks.

use std::time::Duration;

const TICK_QUANTUM: Duration = Duration::from_secs(1);

/// Countdown bound to a level's time budget.
///
/// The clock starts at most once and stops for good when the session ends.
/// Wall-clock time accumulates until a whole second is available, so
/// sub-second ticks are never lost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelClock {
    budget_secs: u32,
    remaining_secs: u32,
    started: bool,
    running: bool,
    accumulator: Duration,
}

impl LevelClock {
    pub(crate) const fn new(budget_secs: u32) -> Self {
        Self {
            budget_secs,
            remaining_secs: budget_secs,
            started: false,
            running: false,
            accumulator: Duration::ZERO,
        }
    }

    /// Starts the countdown; returns `true` only for the first call.
    pub(crate) fn start(&mut self) -> bool {
        if self.started {
            return false;
        }
        self.started = true;
        self.running = true;
        true
    }

    pub(crate) fn stop(&mut self) {
        self.running = false;
        self.accumulator = Duration::ZERO;
    }

    pub(crate) fn accumulate(&mut self, dt: Duration) {
        if self.running {
            self.accumulator = self.accumulator.saturating_add(dt);
        }
    }

    /// Consumes one whole second if available and returns the seconds left.
    pub(crate) fn next_tick(&mut self) -> Option<u32> {
        if !self.running || self.remaining_secs == 0 || self.accumulator < TICK_QUANTUM {
            return None;
        }
        self.accumulator -= TICK_QUANTUM;
        self.remaining_secs -= 1;
        Some(self.remaining_secs)
    }

    /// Reports whether a running clock has nothing left.
    pub(crate) const fn is_expired(&self) -> bool {
        self.running && self.remaining_secs == 0
    }

    /// Budget the clock was created with.
    #[must_use]
    pub const fn budget_secs(&self) -> u32 {
        self.budget_secs
    }

    /// Whole seconds left on the countdown.
    #[must_use]
    pub const fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Reports whether the countdown was ever started.
    #[must_use]
    pub const fn has_started(&self) -> bool {
        self.started
    }

    /// Reports whether ticks currently decrement the countdown.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }
}
