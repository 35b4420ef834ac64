use creepydom_core::{CellCoord, RankId};

/// The player-controlled token of a level session.
///
/// `rank` is always derived from `points`; only the turn controller writes
/// either.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub(crate) cell: CellCoord,
    pub(crate) points: i64,
    pub(crate) rank: RankId,
    pub(crate) history: Vec<CellCoord>,
    pub(crate) movable: bool,
}

impl Player {
    pub(crate) fn spawn(cell: CellCoord, points: i64, rank: RankId) -> Self {
        Self {
            cell,
            points,
            rank,
            history: Vec::new(),
            movable: true,
        }
    }

    /// Cell the player currently occupies.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Accumulated points; poison can push the total below zero.
    #[must_use]
    pub const fn points(&self) -> i64 {
        self.points
    }

    /// Rank derived from the current point total.
    #[must_use]
    pub const fn rank(&self) -> RankId {
        self.rank
    }

    /// Previously occupied cells, oldest first.
    #[must_use]
    pub fn move_history(&self) -> &[CellCoord] {
        &self.history
    }

    /// Reports whether the move lock is released.
    #[must_use]
    pub const fn is_movable(&self) -> bool {
        self.movable
    }
}
