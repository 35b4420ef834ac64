#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Campaign progress tracking that unlocks levels as they are won.

use std::convert::Infallible;

use creepydom_core::{Event, ProgressStore};
use tracing::{debug, info};

/// Level unlocked before anything has been won.
pub const FIRST_LEVEL: u32 = 1;

/// Pure progress system that records wins into a [`ProgressStore`].
#[derive(Debug)]
pub struct Progress<S> {
    store: S,
}

impl<S: ProgressStore> Progress<S> {
    /// Wraps the provided store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Consumes world events and persists any newly unlocked level.
    ///
    /// Only [`Event::GameWon`] matters. The stored value never decreases, so
    /// replaying old wins is harmless. The first store failure aborts the call.
    pub fn handle(&mut self, events: &[Event]) -> Result<(), S::Error> {
        for event in events {
            if let Event::GameWon { level, .. } = event {
                self.record_win(*level)?;
            }
        }
        Ok(())
    }

    fn record_win(&mut self, level: u32) -> Result<(), S::Error> {
        let current = self.unlocked();
        let next = level.saturating_add(1);
        if next <= current {
            debug!(level, unlocked = current, "win on an already completed level");
            return Ok(());
        }
        self.store.set(next)?;
        info!(level = next, "level unlocked");
        Ok(())
    }

    /// Highest unlocked level, never below [`FIRST_LEVEL`].
    #[must_use]
    pub fn unlocked(&self) -> u32 {
        self.store.get().max(FIRST_LEVEL)
    }

    /// Reports whether the provided level may be started.
    #[must_use]
    pub fn is_unlocked(&self, level: u32) -> bool {
        level >= FIRST_LEVEL && level <= self.unlocked()
    }

    /// Reports whether the provided level has been won at least once.
    #[must_use]
    pub fn is_completed(&self, level: u32) -> bool {
        level >= FIRST_LEVEL && level < self.unlocked()
    }

    /// Number of completed levels within a campaign of `level_count` levels.
    #[must_use]
    pub fn completed_levels(&self, level_count: u32) -> u32 {
        (self.unlocked() - FIRST_LEVEL).min(level_count)
    }

    /// Read-only access to the backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}

/// In-memory store for tests and throwaway sessions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryStore {
    unlocked: u32,
}

impl MemoryStore {
    /// Creates a store with only the first level unlocked.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            unlocked: FIRST_LEVEL,
        }
    }

    /// Creates a store that starts with the provided level unlocked.
    #[must_use]
    pub const fn with_unlocked(unlocked: u32) -> Self {
        Self { unlocked }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressStore for MemoryStore {
    type Error = Infallible;

    fn get(&self) -> u32 {
        self.unlocked
    }

    fn set(&mut self, unlocked: u32) -> Result<(), Self::Error> {
        self.unlocked = unlocked;
        Ok(())
    }
}
