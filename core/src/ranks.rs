//! Evolutionary ranks and the read-only table that orders them.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const REFERENCE_RANK_NAMES: [&str; 20] = [
    "Mite",
    "Aphid",
    "Ant",
    "Flea",
    "Termite",
    "Fly",
    "Mosquito",
    "Bee",
    "Wasp",
    "Dragonfly",
    "Butterfly",
    "Grasshopper",
    "Cricket",
    "Beetle",
    "Scorpion",
    "Spider",
    "Praying Mantis",
    "Centipede",
    "Tarantula",
    "T-Rex",
];

/// Index of a rank within a [`RankTable`]; predation and evolution order by it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RankId(u32);

impl RankId {
    /// The lowest rank, used as the fallback for malformed indices.
    pub const ZERO: Self = Self(0);

    /// Creates a rank identifier with the provided index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric index of the rank.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Externally supplied description of a single rank.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankSpec {
    /// Display name shown by presentation layers.
    pub name: String,
    /// Cumulative points required to become this rank.
    pub threshold: i64,
    /// Points granted to a predator that consumes this rank.
    pub base_points: i64,
}

/// Validated rank entry owned by a [`RankTable`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rank {
    id: RankId,
    name: String,
    threshold: i64,
    base_points: i64,
}

impl Rank {
    /// Identifier of the rank.
    #[must_use]
    pub const fn id(&self) -> RankId {
        self.id
    }

    /// Display name of the rank.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cumulative points required to become this rank.
    #[must_use]
    pub const fn threshold(&self) -> i64 {
        self.threshold
    }

    /// Points granted when a creature of this rank is consumed.
    #[must_use]
    pub const fn base_points(&self) -> i64 {
        self.base_points
    }
}

/// Static registry of ranks ordered by strictly increasing threshold.
///
/// The table always holds at least one rank, so lookups never fail: any index
/// outside the table resolves to rank 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankTable {
    ranks: Vec<Rank>,
}

impl RankTable {
    /// Builds the twenty-rank table shipped with the game.
    ///
    /// Rank `i` is worth `2^i` points when eaten and, from rank 1 upward,
    /// requires `2^i` accumulated points to reach. Rank 0 requires nothing.
    #[must_use]
    pub fn reference() -> Self {
        let ranks = REFERENCE_RANK_NAMES
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let base_points = 1_i64 << index;
                Rank {
                    id: RankId::new(index as u32),
                    name: (*name).to_owned(),
                    threshold: if index == 0 { 0 } else { base_points },
                    base_points,
                }
            })
            .collect();
        Self { ranks }
    }

    /// Validates externally supplied rank descriptions into a table.
    pub fn from_specs(specs: Vec<RankSpec>) -> Result<Self, ConfigError> {
        if specs.is_empty() {
            return Err(ConfigError::EmptyRankTable);
        }

        let mut ranks: Vec<Rank> = Vec::with_capacity(specs.len());
        for (index, spec) in specs.into_iter().enumerate() {
            if let Some(previous) = ranks.last() {
                if spec.threshold <= previous.threshold {
                    return Err(ConfigError::NonIncreasingThreshold {
                        index,
                        threshold: spec.threshold,
                        previous: previous.threshold,
                    });
                }
            }
            let id = u32::try_from(index).map_err(|_| ConfigError::TooManyRanks)?;
            ranks.push(Rank {
                id: RankId::new(id),
                name: spec.name,
                threshold: spec.threshold,
                base_points: spec.base_points,
            });
        }

        Ok(Self { ranks })
    }

    /// Returns the rank with the provided identifier, or rank 0 when out of range.
    #[must_use]
    pub fn lookup(&self, id: RankId) -> &Rank {
        let index = usize::try_from(id.get()).unwrap_or(usize::MAX);
        // Construction guarantees a non-empty table.
        self.ranks.get(index).unwrap_or(&self.ranks[0])
    }

    /// Converts a raw, possibly malformed index into a valid identifier.
    ///
    /// Negative indices and indices past the last rank resolve to rank 0.
    #[must_use]
    pub fn resolve(&self, raw: i64) -> RankId {
        match usize::try_from(raw) {
            Ok(index) if index < self.ranks.len() => RankId::new(raw as u32),
            _ => RankId::ZERO,
        }
    }

    /// Reports whether `predator` may consume `prey`; equal ranks may eat each other.
    #[must_use]
    pub fn can_predate(predator: RankId, prey: RankId) -> bool {
        predator >= prey
    }

    /// Highest rank known to the table.
    #[must_use]
    pub fn max_rank(&self) -> RankId {
        self.ranks.last().map_or(RankId::ZERO, Rank::id)
    }

    /// Number of ranks in the table; never zero.
    #[must_use]
    pub fn rank_count(&self) -> usize {
        self.ranks.len()
    }

    /// Iterates ranks from lowest to highest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Rank> {
        self.ranks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str, threshold: i64, base_points: i64) -> RankSpec {
        RankSpec {
            name: name.to_owned(),
            threshold,
            base_points,
        }
    }

    #[test]
    fn reference_table_doubles_per_rank() {
        let table = RankTable::reference();
        assert_eq!(table.rank_count(), 20);
        assert_eq!(table.lookup(RankId::new(0)).threshold(), 0);
        assert_eq!(table.lookup(RankId::new(0)).base_points(), 1);
        assert_eq!(table.lookup(RankId::new(3)).threshold(), 8);
        assert_eq!(table.lookup(RankId::new(3)).name(), "Flea");
        assert_eq!(table.lookup(RankId::new(19)).base_points(), 524_288);
        assert_eq!(table.max_rank(), RankId::new(19));
    }

    #[test]
    fn reference_thresholds_strictly_increase() {
        let table = RankTable::reference();
        let thresholds: Vec<i64> = table.iter().map(Rank::threshold).collect();
        assert!(thresholds.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn out_of_range_lookup_falls_back_to_rank_zero() {
        let table = RankTable::reference();
        assert_eq!(table.lookup(RankId::new(20)).id(), RankId::ZERO);
        assert_eq!(table.lookup(RankId::new(u32::MAX)).name(), "Mite");
    }

    #[test]
    fn resolve_clamps_malformed_indices() {
        let table = RankTable::reference();
        assert_eq!(table.resolve(-1), RankId::ZERO);
        assert_eq!(table.resolve(20), RankId::ZERO);
        assert_eq!(table.resolve(i64::MAX), RankId::ZERO);
        assert_eq!(table.resolve(7), RankId::new(7));
    }

    #[test]
    fn predation_permits_equal_ranks() {
        assert!(RankTable::can_predate(RankId::new(4), RankId::new(4)));
        assert!(RankTable::can_predate(RankId::new(5), RankId::new(4)));
        assert!(!RankTable::can_predate(RankId::new(5), RankId::new(6)));
    }

    #[test]
    fn rejects_empty_specs() {
        assert_eq!(
            RankTable::from_specs(Vec::new()),
            Err(ConfigError::EmptyRankTable)
        );
    }

    #[test]
    fn rejects_non_increasing_thresholds() {
        let error = RankTable::from_specs(vec![
            spec("Egg", 0, 1),
            spec("Larva", 5, 2),
            spec("Pupa", 5, 4),
        ])
        .expect_err("duplicate threshold must be rejected");
        assert_eq!(
            error,
            ConfigError::NonIncreasingThreshold {
                index: 2,
                threshold: 5,
                previous: 5,
            }
        );
    }

    #[test]
    fn custom_specs_keep_their_order() {
        let table = RankTable::from_specs(vec![spec("Egg", 0, 3), spec("Larva", 10, 7)])
            .expect("valid specs");
        assert_eq!(table.max_rank(), RankId::new(1));
        assert_eq!(table.lookup(RankId::new(1)).base_points(), 7);
    }
}
