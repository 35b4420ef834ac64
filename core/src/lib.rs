#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Creepydom engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing player intents and wall-clock time, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that presentation layers animate and systems react to. The static
//! registries ([`RankTable`], [`LevelCatalog`]) are built once at start-up and
//! only ever read afterwards.

mod entity;
mod levels;
mod ranks;

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use entity::{CellContent, Creature, Entity, Mystery, SpecialModifier};
pub use levels::{
    time_budget_for_level, LevelCatalog, LevelDefinition, LevelSpec, DEFAULT_MAX_CREATURE_RANK,
    MAX_GRID_SIZE,
};
pub use ranks::{Rank, RankId, RankSpec, RankTable};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Discards any running session and generates a fresh one for the level.
    StartLevel {
        /// One-based level number; unknown numbers fall back to level 1.
        level: u32,
    },
    /// Discards any running session and builds one from an explicit layout.
    StartArrangedLevel {
        /// One-based level number; unknown numbers fall back to level 1.
        level: u32,
        /// Cell the player starts on.
        player: CellCoord,
        /// Non-player occupants to place before play begins.
        occupants: Vec<Placement>,
    },
    /// Drops the running session without recording any outcome.
    AbandonLevel,
    /// Asks the player token to move toward a neighbouring cell.
    SubmitIntent {
        /// Direction or explicit target of the move.
        intent: Intent,
    },
    /// Signals that the presentation layer finished animating the last move.
    ReleaseMoveLock,
    /// Returns the player to the cell it occupied before its last move.
    UndoMove,
    /// Advances the level clock by the provided wall-clock duration.
    Tick {
        /// Time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A fresh session is ready for input.
    LevelStarted {
        /// Level number that was started.
        level: u32,
        /// Side length of the square grid.
        grid_size: u32,
        /// Cell the player spawned on.
        player: CellCoord,
        /// Rank the player starts as.
        rank: RankId,
        /// Rank the player must reach.
        target: RankId,
        /// Countdown budget in whole seconds.
        time_budget_secs: u32,
    },
    /// The player relocated between two cells.
    Moved {
        /// Cell the player left.
        from: CellCoord,
        /// Cell the player now occupies.
        to: CellCoord,
    },
    /// A mystery box was opened and replaced by its creature.
    MysteryRevealed {
        /// Cell that held the box.
        cell: CellCoord,
        /// Creature that was inside.
        creature: Creature,
    },
    /// The player ate a creature.
    Consumed {
        /// Cell the creature occupied.
        cell: CellCoord,
        /// Creature that was eaten.
        creature: Creature,
        /// Points gained, negative for poison.
        points_delta: i64,
        /// Player's point total after eating.
        points: i64,
    },
    /// The player's derived rank increased.
    Evolved {
        /// Rank before eating.
        from: RankId,
        /// Rank after eating.
        to: RankId,
    },
    /// The player's derived rank decreased after a penalty.
    Devolved {
        /// Rank before eating.
        from: RankId,
        /// Rank after eating.
        to: RankId,
    },
    /// The player was returned to its previous cell.
    MoveUndone {
        /// Cell the player left.
        from: CellCoord,
        /// Cell the player returned to.
        to: CellCoord,
    },
    /// The countdown began after the first accepted move.
    ClockStarted {
        /// Seconds left on the clock.
        remaining_secs: u32,
    },
    /// A whole second elapsed on a running clock.
    ClockTicked {
        /// Seconds left on the clock.
        remaining_secs: u32,
    },
    /// The player reached the target rank.
    GameWon {
        /// Level that was won.
        level: u32,
        /// Rank the player finished with.
        rank: RankId,
        /// Final point total.
        points: i64,
    },
    /// The session ended in defeat.
    GameLost {
        /// Level that was lost.
        level: u32,
        /// Why the session ended.
        reason: LossReason,
    },
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

/// Abstract movement request produced by an input collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Step one cell in a cardinal direction.
    Step(Direction),
    /// Move onto an explicit cell, which must be orthogonally adjacent.
    Target(CellCoord),
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Reports whether the cells share an edge.
    #[must_use]
    pub fn is_adjacent(self, other: CellCoord) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// Returns the neighbouring cell in `direction`, or `None` below zero.
    ///
    /// Upper bounds are the grid's concern.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::North => self.row.checked_sub(1).map(|row| Self::new(self.column, row)),
            Direction::South => self.row.checked_add(1).map(|row| Self::new(self.column, row)),
            Direction::West => self
                .column
                .checked_sub(1)
                .map(|column| Self::new(column, self.row)),
            Direction::East => self
                .column
                .checked_add(1)
                .map(|column| Self::new(column, self.row)),
        }
    }
}

/// Occupant placed by a caller when arranging a level by hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Cell that receives the entity.
    pub cell: CellCoord,
    /// Entity to place; `Entity::Player` placements are ignored.
    pub entity: Entity,
}

/// Reason a session ended in defeat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LossReason {
    /// The player walked into a higher-ranked creature.
    Eaten {
        /// Cell the predator occupies.
        cell: CellCoord,
        /// Creature that ate the player.
        predator: Creature,
    },
    /// The countdown reached zero.
    TimeExpired,
}

impl fmt::Display for LossReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eaten { .. } => f.write_str("eaten"),
            Self::TimeExpired => f.write_str("time expired"),
        }
    }
}

/// Outcome of a level session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The session still accepts input.
    InProgress,
    /// The player reached the target rank.
    Won,
    /// The session ended in defeat.
    Lost(LossReason),
}

impl Outcome {
    /// Reports whether the outcome ends the session's mutability.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Observable state of the turn controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurnState {
    /// No level session exists.
    Idle,
    /// The controller accepts the next intent.
    AwaitingIntent,
    /// A move was accepted and the presentation layer still animates it.
    ResolvingMove,
    /// The session ended; the outcome is never [`Outcome::InProgress`].
    Terminal(Outcome),
}

/// Narrow persistence boundary for the highest unlocked level.
pub trait ProgressStore {
    /// Error raised when the new value cannot be persisted.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Highest unlocked level; a fresh store reports 1.
    fn get(&self) -> u32;

    /// Persists a new highest unlocked level.
    fn set(&mut self, unlocked: u32) -> Result<(), Self::Error>;
}

/// Formats remaining seconds as `m:ss`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockDisplay(pub u32);

impl fmt::Display for ClockDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// Errors raised while validating externally supplied configuration.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The rank list was empty.
    #[error("rank table must contain at least one rank")]
    EmptyRankTable,
    /// The rank list cannot be indexed with 32-bit identifiers.
    #[error("rank table holds more ranks than can be indexed")]
    TooManyRanks,
    /// A rank threshold did not exceed the one before it.
    #[error("rank {index} threshold {threshold} does not exceed the previous threshold {previous}")]
    NonIncreasingThreshold {
        /// Position of the offending rank.
        index: usize,
        /// Threshold of the offending rank.
        threshold: i64,
        /// Threshold of the preceding rank.
        previous: i64,
    },
    /// The level list was empty.
    #[error("level catalog must contain at least one level")]
    EmptyCatalog,
    /// A level grid cannot hold both the player and a neighbour.
    #[error("level {level} grid side {grid_size} is smaller than 2")]
    GridTooSmall {
        /// One-based level number.
        level: u32,
        /// Offending grid side length.
        grid_size: u32,
    },
    /// A level grid exceeds the largest supported side length.
    #[error("level {level} grid side {grid_size} exceeds the maximum of {max}")]
    GridTooLarge {
        /// One-based level number.
        level: u32,
        /// Offending grid side length.
        grid_size: u32,
        /// Largest accepted side length.
        max: u32,
    },
    /// A special probability fell outside the unit interval.
    #[error("level {level} special probability {probability} is outside [0, 1]")]
    InvalidProbability {
        /// One-based level number.
        level: u32,
        /// Offending probability.
        probability: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, ClockDisplay, Direction, LossReason, Outcome};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn adjacency_excludes_diagonals_and_self() {
        let origin = CellCoord::new(2, 2);
        assert!(origin.is_adjacent(CellCoord::new(2, 1)));
        assert!(origin.is_adjacent(CellCoord::new(3, 2)));
        assert!(!origin.is_adjacent(CellCoord::new(3, 3)));
        assert!(!origin.is_adjacent(CellCoord::new(2, 4)));
        assert!(!origin.is_adjacent(origin));
    }

    #[test]
    fn step_refuses_to_underflow() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.step(Direction::North), None);
        assert_eq!(corner.step(Direction::West), None);
        assert_eq!(corner.step(Direction::East), Some(CellCoord::new(1, 0)));
        assert_eq!(corner.step(Direction::South), Some(CellCoord::new(0, 1)));
    }

    #[test]
    fn clock_display_pads_seconds() {
        assert_eq!(ClockDisplay(90).to_string(), "1:30");
        assert_eq!(ClockDisplay(65).to_string(), "1:05");
        assert_eq!(ClockDisplay(0).to_string(), "0:00");
    }

    #[test]
    fn loss_reasons_render_short_labels() {
        assert_eq!(LossReason::TimeExpired.to_string(), "time expired");
        assert!(Outcome::Lost(LossReason::TimeExpired).is_terminal());
        assert!(Outcome::Won.is_terminal());
        assert!(!Outcome::InProgress.is_terminal());
    }
}
