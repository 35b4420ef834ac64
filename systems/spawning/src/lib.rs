#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded entity factory that produces creatures and mystery boxes.
//!
//! All randomness flows through a single ChaCha stream, so a seed fully
//! determines every creature, modifier, mystery content, and cell choice the
//! factory hands out.

use creepydom_core::{CellCoord, Creature, Mystery, RankId, SpecialModifier};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const BONUS_MODIFIERS: [SpecialModifier; 2] =
    [SpecialModifier::Multiply2, SpecialModifier::Multiply3];
const PENALTY_MODIFIERS: [SpecialModifier; 2] =
    [SpecialModifier::Divide2, SpecialModifier::Poison];

/// Band of the fixed mystery lottery a roll landed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MysteryTier {
    /// `[0, 0.3)`: low rank with a multiplier.
    Bonus,
    /// `[0.3, 0.5)`: low rank with a penalty.
    Penalty,
    /// `[0.5, 0.8)`: small plain creature.
    Common,
    /// `[0.8, 1)`: large plain creature that likely eats the player.
    Threat,
}

impl MysteryTier {
    /// Maps a uniform roll in `[0, 1)` onto its band.
    #[must_use]
    pub fn from_roll(roll: f64) -> Self {
        if roll < 0.3 {
            Self::Bonus
        } else if roll < 0.5 {
            Self::Penalty
        } else if roll < 0.8 {
            Self::Common
        } else {
            Self::Threat
        }
    }

    /// Inclusive rank bounds of the band, capped at `max_known`.
    #[must_use]
    pub fn rank_bounds(self, max_known: RankId) -> (RankId, RankId) {
        let (low, high) = match self {
            Self::Bonus => (0, 3),
            Self::Penalty => (0, 2),
            Self::Common => (0, 4),
            Self::Threat => (5, 10),
        };
        (
            RankId::new(low).min(max_known),
            RankId::new(high).min(max_known),
        )
    }

    /// Modifiers the band draws from; empty for plain bands.
    #[must_use]
    pub fn modifiers(self) -> &'static [SpecialModifier] {
        match self {
            Self::Bonus => &BONUS_MODIFIERS,
            Self::Penalty => &PENALTY_MODIFIERS,
            Self::Common | Self::Threat => &[],
        }
    }
}

/// Stochastic generator for grid occupants.
#[derive(Clone, Debug)]
pub struct EntityFactory {
    rng: ChaCha8Rng,
}

impl EntityFactory {
    /// Creates a factory whose output is fully determined by `seed`.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generates a creature with rank drawn uniformly from `0..=max_rank`.
    ///
    /// With probability `special_probability` the creature carries a modifier
    /// drawn uniformly from all four. Probabilities outside `[0, 1]` behave as
    /// the nearest bound.
    pub fn generate_creature(&mut self, max_rank: RankId, special_probability: f64) -> Creature {
        let rank = RankId::new(self.rng.gen_range(0..=max_rank.get()));
        if self.rng.gen::<f64>() < special_probability {
            let modifier = SpecialModifier::ALL
                .choose(&mut self.rng)
                .copied()
                .unwrap_or(SpecialModifier::Multiply2);
            Creature::special(rank, modifier)
        } else {
            Creature::plain(rank)
        }
    }

    /// Generates a mystery box from the fixed four-band lottery.
    ///
    /// The lottery ignores the level's special probability; `max_known` is the
    /// highest rank in the table and caps every band.
    pub fn generate_mystery(&mut self, max_known: RankId) -> Mystery {
        let tier = MysteryTier::from_roll(self.rng.gen::<f64>());
        let (low, high) = tier.rank_bounds(max_known);
        let rank = RankId::new(self.rng.gen_range(low.get()..=high.get()));
        let hidden = match tier.modifiers().choose(&mut self.rng) {
            Some(modifier) => Creature::special(rank, *modifier),
            None => Creature::plain(rank),
        };
        Mystery::new(hidden)
    }

    /// Shuffles candidate cells in place.
    pub fn shuffle_cells(&mut self, cells: &mut [CellCoord]) {
        cells.shuffle(&mut self.rng);
    }

    /// Picks one cell uniformly, or `None` when there are no candidates.
    pub fn pick_cell(&mut self, cells: &[CellCoord]) -> Option<CellCoord> {
        cells.choose(&mut self.rng).copied()
    }
}
