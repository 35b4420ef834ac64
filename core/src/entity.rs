//! Grid occupants and the special modifiers that alter their value.

use serde::{Deserialize, Serialize};

use crate::RankId;

/// Points-gained transform attached to a non-player creature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialModifier {
    /// Doubles the points gained.
    Multiply2,
    /// Triples the points gained.
    Multiply3,
    /// Halves the points gained, rounding toward negative infinity.
    Divide2,
    /// Replaces the points gained with a flat penalty.
    Poison,
}

impl SpecialModifier {
    /// Every modifier, in the order the factory draws from.
    pub const ALL: [Self; 4] = [
        Self::Multiply2,
        Self::Multiply3,
        Self::Divide2,
        Self::Poison,
    ];

    /// Points gained from a poisoned creature regardless of its rank.
    pub const POISON_PENALTY: i64 = -50;

    /// Applies the transform to the base points of the consumed creature.
    #[must_use]
    pub const fn apply(self, base_points: i64) -> i64 {
        match self {
            Self::Multiply2 => base_points.saturating_mul(2),
            Self::Multiply3 => base_points.saturating_mul(3),
            Self::Divide2 => base_points.div_euclid(2),
            Self::Poison => Self::POISON_PENALTY,
        }
    }

    /// Short label used by presentation layers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Multiply2 => "x2",
            Self::Multiply3 => "x3",
            Self::Divide2 => "/2",
            Self::Poison => "-50",
        }
    }
}

/// Creature occupying a grid cell; it can be eaten or can eat the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Creature {
    rank: RankId,
    modifier: Option<SpecialModifier>,
}

impl Creature {
    /// Creates a creature without a special modifier.
    #[must_use]
    pub const fn plain(rank: RankId) -> Self {
        Self {
            rank,
            modifier: None,
        }
    }

    /// Creates a creature carrying the provided modifier.
    #[must_use]
    pub const fn special(rank: RankId, modifier: SpecialModifier) -> Self {
        Self {
            rank,
            modifier: Some(modifier),
        }
    }

    /// Rank of the creature.
    #[must_use]
    pub const fn rank(&self) -> RankId {
        self.rank
    }

    /// Modifier attached to the creature, if any.
    #[must_use]
    pub const fn modifier(&self) -> Option<SpecialModifier> {
        self.modifier
    }
}

/// Occupant whose creature is generated up front but withheld until touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mystery {
    resolved: bool,
    hidden: Creature,
}

impl Mystery {
    /// Wraps the creature that the mystery box will reveal.
    #[must_use]
    pub const fn new(hidden: Creature) -> Self {
        Self {
            resolved: false,
            hidden,
        }
    }

    /// Reports whether the box was already opened.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Opens the box and returns its creature.
    ///
    /// Repeated calls return the same creature and change nothing further.
    pub fn reveal(&mut self) -> Creature {
        self.resolved = true;
        self.hidden
    }
}

/// Content of a single grid cell.
///
/// The player's points and history live on the session; the grid only records
/// where the player stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entity {
    /// A visible creature.
    Creature(Creature),
    /// A mystery box hiding a creature.
    Mystery(Mystery),
    /// The player-controlled token.
    Player,
}

/// Presentation-safe view of a cell that never leaks mystery contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellContent {
    /// No occupant.
    Empty,
    /// The player-controlled token.
    Player,
    /// A visible creature.
    Creature(Creature),
    /// An unopened mystery box.
    Mystery,
}

impl From<Option<&Entity>> for CellContent {
    fn from(entity: Option<&Entity>) -> Self {
        match entity {
            None => Self::Empty,
            Some(Entity::Player) => Self::Player,
            Some(Entity::Creature(creature)) => Self::Creature(*creature),
            Some(Entity::Mystery(_)) => Self::Mystery,
        }
    }
}
