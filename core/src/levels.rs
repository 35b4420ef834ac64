//! Level definitions and the catalog that serves them.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, RankId, RankTable};

/// Highest creature rank scattered across a level unless its data says otherwise.
pub const DEFAULT_MAX_CREATURE_RANK: u32 = 8;

/// Largest grid side a level may declare; the shipped campaign stays within 6..=13.
pub const MAX_GRID_SIZE: u32 = 64;

// (grid side, start rank, target rank, special probability)
const REFERENCE_LEVELS: [(u32, i64, i64, f64); 20] = [
    (6, 0, 3, 0.05),
    (7, 1, 4, 0.08),
    (7, 2, 5, 0.10),
    (8, 2, 6, 0.12),
    (8, 3, 7, 0.15),
    (8, 4, 8, 0.15),
    (9, 5, 9, 0.18),
    (9, 6, 10, 0.20),
    (9, 7, 11, 0.20),
    (10, 8, 12, 0.22),
    (10, 9, 13, 0.25),
    (10, 10, 14, 0.25),
    (11, 11, 15, 0.28),
    (11, 12, 16, 0.30),
    (11, 13, 17, 0.30),
    (12, 14, 18, 0.32),
    (12, 15, 18, 0.35),
    (12, 16, 19, 0.35),
    (13, 17, 19, 0.38),
    (13, 18, 19, 0.40),
];

/// Time budget in whole seconds granted to the provided level number.
///
/// A tuned step table: levels 1-3 get 90s, 4-6 get 75s, 7-10 get 60s,
/// 11-15 get 50s and everything later gets 40s.
#[must_use]
pub const fn time_budget_for_level(level: u32) -> u32 {
    match level {
        0..=3 => 90,
        4..=6 => 75,
        7..=10 => 60,
        11..=15 => 50,
        _ => 40,
    }
}

/// Externally supplied description of a single level.
///
/// Rank indices are kept raw so malformed data can be clamped instead of rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelSpec {
    /// Side length of the square grid.
    pub grid_size: u32,
    /// Rank the player starts the level as.
    pub start_rank: i64,
    /// Rank the player must reach to win.
    pub target_rank: i64,
    /// Probability that a populated creature carries a special modifier.
    pub special_probability: f64,
    /// Explicit time budget; the step table applies when absent.
    #[serde(default)]
    pub time_budget_secs: Option<u32>,
    /// Highest rank scattered during population; defaults to rank 8 or the top rank.
    #[serde(default)]
    pub max_creature_rank: Option<i64>,
    /// Number of populated cells that hold mystery boxes instead of creatures.
    #[serde(default)]
    pub mystery_cells: u32,
}

/// Immutable, fully resolved definition of a level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    number: u32,
    grid_size: u32,
    start_rank: RankId,
    target_rank: RankId,
    special_probability: f64,
    time_budget_secs: u32,
    max_creature_rank: RankId,
    mystery_cells: u32,
}

impl LevelDefinition {
    fn resolve(number: u32, spec: &LevelSpec, ranks: &RankTable) -> Self {
        let max_creature_rank = match spec.max_creature_rank {
            Some(raw) => ranks.resolve(raw),
            None => RankId::new(DEFAULT_MAX_CREATURE_RANK).min(ranks.max_rank()),
        };
        Self {
            number,
            grid_size: spec.grid_size,
            start_rank: ranks.resolve(spec.start_rank),
            target_rank: ranks.resolve(spec.target_rank),
            special_probability: spec.special_probability,
            time_budget_secs: spec
                .time_budget_secs
                .unwrap_or_else(|| time_budget_for_level(number)),
            max_creature_rank,
            mystery_cells: spec.mystery_cells,
        }
    }

    /// One-based level number.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Side length of the square grid.
    #[must_use]
    pub const fn grid_size(&self) -> u32 {
        self.grid_size
    }

    /// Rank the player starts as.
    #[must_use]
    pub const fn start_rank(&self) -> RankId {
        self.start_rank
    }

    /// Rank the player must reach to win.
    #[must_use]
    pub const fn target_rank(&self) -> RankId {
        self.target_rank
    }

    /// Probability that a populated creature carries a special modifier.
    #[must_use]
    pub const fn special_probability(&self) -> f64 {
        self.special_probability
    }

    /// Countdown budget in whole seconds.
    #[must_use]
    pub const fn time_budget_secs(&self) -> u32 {
        self.time_budget_secs
    }

    /// Inclusive upper bound on populated creature ranks.
    #[must_use]
    pub const fn max_creature_rank(&self) -> RankId {
        self.max_creature_rank
    }

    /// Number of populated cells that hold mystery boxes.
    #[must_use]
    pub const fn mystery_cells(&self) -> u32 {
        self.mystery_cells
    }
}

/// Static registry of level definitions, numbered from 1.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelCatalog {
    levels: Vec<LevelDefinition>,
}

impl LevelCatalog {
    /// Builds the twenty-level campaign shipped with the game.
    #[must_use]
    pub fn reference(ranks: &RankTable) -> Self {
        let levels = REFERENCE_LEVELS
            .iter()
            .zip(1_u32..)
            .map(|(&(grid_size, start_rank, target_rank, special_probability), number)| {
                let spec = LevelSpec {
                    grid_size,
                    start_rank,
                    target_rank,
                    special_probability,
                    time_budget_secs: None,
                    max_creature_rank: None,
                    mystery_cells: 0,
                };
                LevelDefinition::resolve(number, &spec, ranks)
            })
            .collect();
        Self { levels }
    }

    /// Validates externally supplied level descriptions against the rank table.
    pub fn from_specs(specs: &[LevelSpec], ranks: &RankTable) -> Result<Self, ConfigError> {
        if specs.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }

        let mut levels = Vec::with_capacity(specs.len());
        for (spec, number) in specs.iter().zip(1_u32..) {
            if spec.grid_size < 2 {
                return Err(ConfigError::GridTooSmall {
                    level: number,
                    grid_size: spec.grid_size,
                });
            }
            if spec.grid_size > MAX_GRID_SIZE {
                return Err(ConfigError::GridTooLarge {
                    level: number,
                    grid_size: spec.grid_size,
                    max: MAX_GRID_SIZE,
                });
            }
            if !(0.0..=1.0).contains(&spec.special_probability) {
                return Err(ConfigError::InvalidProbability {
                    level: number,
                    probability: spec.special_probability,
                });
            }
            levels.push(LevelDefinition::resolve(number, spec, ranks));
        }

        Ok(Self { levels })
    }

    /// Returns the definition for `level`, falling back to level 1 when out of range.
    #[must_use]
    pub fn lookup(&self, level: u32) -> &LevelDefinition {
        let index = level
            .checked_sub(1)
            .and_then(|index| usize::try_from(index).ok())
            .unwrap_or(usize::MAX);
        // Construction guarantees a non-empty catalog.
        self.levels.get(index).unwrap_or(&self.levels[0])
    }

    /// Number of levels in the catalog; never zero.
    #[must_use]
    pub fn level_count(&self) -> u32 {
        u32::try_from(self.levels.len()).unwrap_or(u32::MAX)
    }

    /// Iterates definitions in level order.
    pub fn iter(&self) -> impl Iterator<Item = &LevelDefinition> {
        self.levels.iter()
    }
}
