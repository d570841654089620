//! Primitive rolls.

use serde::{Deserialize, Serialize};
use warmarch_core::rng::DeterministicRng;

/// Whether a check rolls once, or twice keeping the best/worst.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advantage {
    /// A single roll.
    #[default]
    Normal,
    /// Roll twice, keep the higher.
    Advantage,
    /// Roll twice, keep the lower.
    Disadvantage,
}

/// Rolls one uniform die in `[1, sides]`.
///
/// # Panics
///
/// May panic if `sides` is 0 (the RNG range is empty); notation parsing
/// rejects zero-sided dice before they reach here.
pub fn roll_die(rng: &mut dyn DeterministicRng, sides: u32) -> u32 {
    rng.next_u32_range(1, sides)
}

/// Rolls `count` uniform dice of `sides`, in order.
pub fn roll_dice(rng: &mut dyn DeterministicRng, count: u32, sides: u32) -> Vec<u32> {
    (0..count).map(|_| roll_die(rng, sides)).collect()
}

/// The `keep` highest results, sorted descending.
#[must_use]
pub fn keep_highest(rolls: &[u32], keep: usize) -> Vec<u32> {
    let mut sorted = rolls.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.truncate(keep);
    sorted
}

/// The `keep` lowest results, sorted ascending.
#[must_use]
pub fn keep_lowest(rolls: &[u32], keep: usize) -> Vec<u32> {
    let mut sorted = rolls.to_vec();
    sorted.sort_unstable();
    sorted.truncate(keep);
    sorted
}

/// Both rolls of an advantage/disadvantage pair, plus the one kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvantageRoll {
    /// First die.
    pub first: u32,
    /// Second die.
    pub second: u32,
    /// The kept result.
    pub result: u32,
}

/// Rolls twice, keeping the higher.
pub fn roll_with_advantage(rng: &mut dyn DeterministicRng, sides: u32) -> AdvantageRoll {
    let first = roll_die(rng, sides);
    let second = roll_die(rng, sides);
    AdvantageRoll {
        first,
        second,
        result: first.max(second),
    }
}

/// Rolls twice, keeping the lower.
pub fn roll_with_disadvantage(rng: &mut dyn DeterministicRng, sides: u32) -> AdvantageRoll {
    let first = roll_die(rng, sides);
    let second = roll_die(rng, sides);
    AdvantageRoll {
        first,
        second,
        result: first.min(second),
    }
}

#[cfg(test)]
mod tests {
    use warmarch_test_support::SequenceRng;

    use super::*;

    #[test]
    fn test_roll_dice_preserves_order() {
        let mut rng = SequenceRng::new(vec![3, 1, 6]);
        assert_eq!(roll_dice(&mut rng, 3, 6), vec![3, 1, 6]);
    }

    #[test]
    fn test_keep_highest_takes_top_k() {
        assert_eq!(keep_highest(&[2, 6, 4, 1], 2), vec![6, 4]);
    }

    #[test]
    fn test_keep_lowest_takes_bottom_k() {
        assert_eq!(keep_lowest(&[2, 6, 4, 1], 2), vec![1, 2]);
    }

    #[test]
    fn test_keep_more_than_rolled_returns_all() {
        assert_eq!(keep_highest(&[3, 5], 4), vec![5, 3]);
    }

    #[test]
    fn test_advantage_keeps_higher_and_reports_both() {
        let mut rng = SequenceRng::new(vec![7, 15]);
        let roll = roll_with_advantage(&mut rng, 20);
        assert_eq!((roll.first, roll.second, roll.result), (7, 15, 15));
    }

    #[test]
    fn test_disadvantage_keeps_lower_and_reports_both() {
        let mut rng = SequenceRng::new(vec![7, 15]);
        let roll = roll_with_disadvantage(&mut rng, 20);
        assert_eq!((roll.first, roll.second, roll.result), (7, 15, 7));
    }
}
