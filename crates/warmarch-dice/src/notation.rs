//! Dice notation.
//!
//! The wire grammar is `[count]d<sides>[+|-modifier]`: an optional count
//! (default 1), a case-insensitive `d`, the die size, and an optional signed
//! integer modifier. The whole string must match; the same notation always
//! parses to the same structural roll request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use warmarch_core::rng::DeterministicRng;

use crate::error::DiceError;
use crate::roll::roll_dice;

/// A structural roll request parsed from notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollSpec {
    /// Number of dice to roll. Zero is admitted by the grammar and rolls
    /// nothing.
    pub count: u32,
    /// Sides per die, at least 1.
    pub sides: u32,
    /// Flat modifier added to the summed rolls.
    pub modifier: i32,
}

impl RollSpec {
    /// Builds a roll spec directly, bypassing notation parsing.
    #[must_use]
    pub const fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            count,
            sides,
            modifier,
        }
    }

    /// Rolls this spec: `count` uniform dice of `sides`, summed, plus the
    /// modifier.
    pub fn roll(&self, rng: &mut dyn DeterministicRng) -> RollOutcome {
        let rolls = roll_dice(rng, self.count, self.sides);
        let total = rolls.iter().map(|&r| i64::from(r)).sum::<i64>() + i64::from(self.modifier);
        RollOutcome {
            spec: *self,
            rolls,
            total,
        }
    }
}

impl fmt::Display for RollSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        if self.modifier > 0 {
            write!(f, "+{}", self.modifier)?;
        } else if self.modifier < 0 {
            write!(f, "{}", self.modifier)?;
        }
        Ok(())
    }
}

fn digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

impl FromStr for RollSpec {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DiceError::InvalidNotation(s.to_owned());

        let trimmed = s.trim();
        let d = trimmed.find(['d', 'D']).ok_or_else(invalid)?;
        let (count_part, after_d) = (&trimmed[..d], &trimmed[d + 1..]);

        let count = if count_part.is_empty() {
            1
        } else if digits(count_part) {
            count_part.parse().map_err(|_| invalid())?
        } else {
            return Err(invalid());
        };

        let (sides_part, modifier_part) = match after_d.find(['+', '-']) {
            Some(sign) => (&after_d[..sign], Some(&after_d[sign..])),
            None => (after_d, None),
        };

        if !digits(sides_part) {
            return Err(invalid());
        }
        let sides: u32 = sides_part.parse().map_err(|_| invalid())?;
        if sides == 0 {
            return Err(invalid());
        }

        let modifier = match modifier_part {
            Some(part) if digits(&part[1..]) => part.parse().map_err(|_| invalid())?,
            Some(_) => return Err(invalid()),
            None => 0,
        };

        Ok(Self {
            count,
            sides,
            modifier,
        })
    }
}

/// The numeric outcome of rolling a [`RollSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    /// The structural request that produced this outcome.
    pub spec: RollSpec,
    /// Individual die results, in roll order.
    pub rolls: Vec<u32>,
    /// `sum(rolls) + spec.modifier`.
    pub total: i64,
}

/// Parses `notation` and rolls it in one step.
///
/// # Errors
///
/// Returns `DiceError::InvalidNotation` if `notation` does not match the
/// grammar.
pub fn roll_from_notation(
    notation: &str,
    rng: &mut dyn DeterministicRng,
) -> Result<RollOutcome, DiceError> {
    Ok(notation.parse::<RollSpec>()?.roll(rng))
}

#[cfg(test)]
mod tests {
    use warmarch_test_support::SequenceRng;

    use super::*;

    #[test]
    fn test_parse_full_notation() {
        let spec: RollSpec = "2d6+3".parse().unwrap();
        assert_eq!(spec, RollSpec::new(2, 6, 3));
    }

    #[test]
    fn test_parse_count_defaults_to_one() {
        let spec: RollSpec = "d20".parse().unwrap();
        assert_eq!(spec, RollSpec::new(1, 20, 0));
    }

    #[test]
    fn test_parse_negative_modifier() {
        let spec: RollSpec = "1d20-2".parse().unwrap();
        assert_eq!(spec, RollSpec::new(1, 20, -2));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let spec: RollSpec = "3D8".parse().unwrap();
        assert_eq!(spec, RollSpec::new(3, 8, 0));
    }

    #[test]
    fn test_parse_explicit_zero_count() {
        let spec: RollSpec = "0d6".parse().unwrap();
        assert_eq!(spec.count, 0);
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        for bad in ["bogus", "", "2d", "d", "2x6", "2d6+", "2d6++3", "+2d6", "2d-6", "2d0"] {
            let err = bad.parse::<RollSpec>().unwrap_err();
            assert_eq!(err, DiceError::InvalidNotation(bad.to_owned()), "input {bad:?}");
        }
    }

    #[test]
    fn test_display_round_trips() {
        for notation in ["2d6+3", "1d20", "4d8-1"] {
            let spec: RollSpec = notation.parse().unwrap();
            assert_eq!(spec.to_string(), notation);
            assert_eq!(spec.to_string().parse::<RollSpec>().unwrap(), spec);
        }
    }

    #[test]
    fn test_roll_sums_and_applies_modifier() {
        let mut rng = SequenceRng::new(vec![4, 2]);
        let outcome = roll_from_notation("2d6+3", &mut rng).unwrap();
        assert_eq!(outcome.rolls, vec![4, 2]);
        assert_eq!(outcome.total, 9);
    }

    #[test]
    fn test_roll_negative_modifier_can_go_below_roll() {
        let mut rng = SequenceRng::new(vec![1]);
        let outcome = roll_from_notation("1d20-2", &mut rng).unwrap();
        assert_eq!(outcome.rolls, vec![1]);
        assert_eq!(outcome.total, -1);
    }

    #[test]
    fn test_zero_count_rolls_nothing() {
        let mut rng = SequenceRng::new(vec![]);
        let outcome = roll_from_notation("0d6+5", &mut rng).unwrap();
        assert!(outcome.rolls.is_empty());
        assert_eq!(outcome.total, 5);
    }
}
