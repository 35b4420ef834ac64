#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure predation, scoring, and evolution rules.
//!
//! Every function here is stateless and total: the world calls them while
//! resolving a turn, and presentation layers may call them to preview a move.

use creepydom_core::{Creature, RankId, RankTable};

/// Reports whether a player of rank `player` may eat `target`.
#[must_use]
pub fn can_consume(player: RankId, target: &Creature) -> bool {
    RankTable::can_predate(player, target.rank())
}

/// Points the player gains by eating `target`.
///
/// Plain creatures are worth their rank's base points; a modifier transforms
/// that value, and poison always yields exactly -50.
#[must_use]
pub fn points_gained(ranks: &RankTable, target: &Creature) -> i64 {
    let base_points = ranks.lookup(target.rank()).base_points();
    match target.modifier() {
        Some(modifier) => modifier.apply(base_points),
        None => base_points,
    }
}

/// Highest rank whose threshold does not exceed `points`, or rank 0.
///
/// Scans from the top rank downward and stops at the first match.
#[must_use]
pub fn evolution_target(ranks: &RankTable, points: i64) -> RankId {
    ranks
        .iter()
        .rev()
        .find(|rank| rank.threshold() <= points)
        .map_or(RankId::ZERO, |rank| rank.id())
}

/// Direction of a derived-rank recomputation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankChange {
    /// The rank did not move.
    Unchanged,
    /// The rank increased.
    Evolved {
        /// Previous rank.
        from: RankId,
        /// New rank.
        to: RankId,
    },
    /// The rank decreased.
    Devolved {
        /// Previous rank.
        from: RankId,
        /// New rank.
        to: RankId,
    },
}

/// Classifies the transition between two derived ranks.
#[must_use]
pub fn rank_change(from: RankId, to: RankId) -> RankChange {
    match to.cmp(&from) {
        std::cmp::Ordering::Greater => RankChange::Evolved { from, to },
        std::cmp::Ordering::Less => RankChange::Devolved { from, to },
        std::cmp::Ordering::Equal => RankChange::Unchanged,
    }
}

/// Fraction of the target rank's threshold that `points` covers, clamped to `[0, 1]`.
#[must_use]
pub fn target_progress(ranks: &RankTable, points: i64, target: RankId) -> f64 {
    let threshold = ranks.lookup(target).threshold();
    if points >= threshold {
        return 1.0;
    }
    if threshold <= 0 || points <= 0 {
        return 0.0;
    }
    (points as f64 / threshold as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use creepydom_core::SpecialModifier;

    #[test]
    fn plain_creatures_are_worth_base_points() {
        let ranks = RankTable::reference();
        assert_eq!(points_gained(&ranks, &Creature::plain(RankId::new(1))), 2);
        assert_eq!(points_gained(&ranks, &Creature::plain(RankId::new(5))), 32);
    }

    #[test]
    fn modifiers_transform_base_points() {
        let ranks = RankTable::reference();
        let rank = RankId::new(2);
        let gained = |modifier| points_gained(&ranks, &Creature::special(rank, modifier));
        assert_eq!(gained(SpecialModifier::Multiply2), 8);
        assert_eq!(gained(SpecialModifier::Multiply3), 12);
        assert_eq!(gained(SpecialModifier::Divide2), 2);
        assert_eq!(gained(SpecialModifier::Poison), -50);
    }

    #[test]
    fn evolution_target_defaults_to_rank_zero() {
        let ranks = RankTable::reference();
        assert_eq!(evolution_target(&ranks, -50), RankId::ZERO);
        assert_eq!(evolution_target(&ranks, 0), RankId::ZERO);
        assert_eq!(evolution_target(&ranks, 1), RankId::ZERO);
    }

    #[test]
    fn evolution_target_picks_highest_reached_threshold() {
        let ranks = RankTable::reference();
        assert_eq!(evolution_target(&ranks, 2), RankId::new(1));
        assert_eq!(evolution_target(&ranks, 14), RankId::new(3));
        assert_eq!(evolution_target(&ranks, 16), RankId::new(4));
        assert_eq!(evolution_target(&ranks, i64::MAX), RankId::new(19));
    }

    #[test]
    fn rank_change_reports_direction() {
        let low = RankId::new(2);
        let high = RankId::new(4);
        assert_eq!(
            rank_change(low, high),
            RankChange::Evolved { from: low, to: high }
        );
        assert_eq!(
            rank_change(high, low),
            RankChange::Devolved { from: high, to: low }
        );
        assert_eq!(rank_change(low, low), RankChange::Unchanged);
    }

    #[test]
    fn target_progress_is_clamped() {
        let ranks = RankTable::reference();
        let target = RankId::new(3);
        assert!((target_progress(&ranks, 4, target) - 0.5).abs() < f64::EPSILON);
        assert!((target_progress(&ranks, 100, target) - 1.0).abs() < f64::EPSILON);
        assert!(target_progress(&ranks, -50, target).abs() < f64::EPSILON);
        assert!((target_progress(&ranks, 0, RankId::ZERO) - 1.0).abs() < f64::EPSILON);
    }
}
