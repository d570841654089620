//! Check resolution.
//!
//! Every check in the game — attack, save, morale, domain skill test — is the
//! same composite: roll 1d20 (or an advantage pair), add a bonus, compare to
//! a target number. Only the bonus source differs.

use serde::{Deserialize, Serialize};
use warmarch_core::rng::DeterministicRng;

use crate::roll::{Advantage, roll_die, roll_with_advantage, roll_with_disadvantage};

/// The resolved outcome of a d20 check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// The kept natural roll.
    pub roll: u32,
    /// Both natural rolls when rolled with advantage/disadvantage.
    pub pair: Option<(u32, u32)>,
    /// The flat bonus added to the roll.
    pub bonus: i32,
    /// `roll + bonus`.
    pub total: i32,
    /// The difficulty / target number.
    pub dc: i32,
    /// `total >= dc`.
    pub success: bool,
}

/// Rolls a d20 check against `dc`.
#[allow(clippy::cast_possible_wrap)]
pub fn skill_check(
    rng: &mut dyn DeterministicRng,
    bonus: i32,
    dc: i32,
    advantage: Advantage,
) -> CheckResult {
    let (roll, pair) = match advantage {
        Advantage::Normal => (roll_die(rng, 20), None),
        Advantage::Advantage => {
            let rolled = roll_with_advantage(rng, 20);
            (rolled.result, Some((rolled.first, rolled.second)))
        }
        Advantage::Disadvantage => {
            let rolled = roll_with_disadvantage(rng, 20);
            (rolled.result, Some((rolled.first, rolled.second)))
        }
    };
    let total = roll as i32 + bonus;
    CheckResult {
        roll,
        pair,
        bonus,
        total,
        dc,
        success: total >= dc,
    }
}

/// Attack roll: the unit's attack bonus against the target's defense score.
pub fn attack_roll(
    rng: &mut dyn DeterministicRng,
    attack_bonus: i32,
    defense_score: i32,
    advantage: Advantage,
) -> CheckResult {
    skill_check(rng, attack_bonus, defense_score, advantage)
}

/// Saving throw: the unit's toughness-derived bonus against a DC.
pub fn saving_throw(
    rng: &mut dyn DeterministicRng,
    save_bonus: i32,
    dc: i32,
    advantage: Advantage,
) -> CheckResult {
    skill_check(rng, save_bonus, dc, advantage)
}

/// Morale check: the unit's morale bonus against a DC.
pub fn morale_check(
    rng: &mut dyn DeterministicRng,
    morale_bonus: i32,
    dc: i32,
    advantage: Advantage,
) -> CheckResult {
    skill_check(rng, morale_bonus, dc, advantage)
}

/// Domain skill test: skill modifier plus the domain's proficiency bonus
/// (`2 + size / 2`) against a DC.
pub fn domain_skill_check(
    rng: &mut dyn DeterministicRng,
    skill_modifier: i32,
    domain_size: u8,
    dc: i32,
    advantage: Advantage,
) -> CheckResult {
    let proficiency = 2 + i32::from(domain_size / 2);
    skill_check(rng, skill_modifier + proficiency, dc, advantage)
}

#[cfg(test)]
mod tests {
    use warmarch_test_support::SequenceRng;

    use super::*;

    #[test]
    fn test_check_succeeds_on_exact_dc() {
        let mut rng = SequenceRng::new(vec![12]);
        let result = skill_check(&mut rng, 3, 15, Advantage::Normal);
        assert_eq!(result.total, 15);
        assert!(result.success);
        assert_eq!(result.pair, None);
    }

    #[test]
    fn test_check_fails_below_dc() {
        let mut rng = SequenceRng::new(vec![11]);
        let result = skill_check(&mut rng, 3, 15, Advantage::Normal);
        assert_eq!(result.total, 14);
        assert!(!result.success);
    }

    #[test]
    fn test_advantage_keeps_higher_roll_and_reports_pair() {
        let mut rng = SequenceRng::new(vec![4, 18]);
        let result = skill_check(&mut rng, 0, 10, Advantage::Advantage);
        assert_eq!(result.roll, 18);
        assert_eq!(result.pair, Some((4, 18)));
        assert!(result.success);
    }

    #[test]
    fn test_disadvantage_keeps_lower_roll() {
        let mut rng = SequenceRng::new(vec![4, 18]);
        let result = skill_check(&mut rng, 0, 10, Advantage::Disadvantage);
        assert_eq!(result.roll, 4);
        assert!(!result.success);
    }

    #[test]
    fn test_negative_bonus_applies() {
        let mut rng = SequenceRng::new(vec![10]);
        let result = saving_throw(&mut rng, -4, 8, Advantage::Normal);
        assert_eq!(result.total, 6);
        assert!(!result.success);
    }

    #[test]
    fn test_domain_skill_check_folds_in_proficiency() {
        // Size 4 domain: proficiency 2 + 4/2 = 4. Roll 10 + skill 3 + 4 = 17.
        let mut rng = SequenceRng::new(vec![10]);
        let result = domain_skill_check(&mut rng, 3, 4, 17, Advantage::Normal);
        assert_eq!(result.bonus, 7);
        assert_eq!(result.total, 17);
        assert!(result.success);
    }

    #[test]
    fn test_domain_proficiency_floors_odd_sizes() {
        // Size 3 domain: proficiency 2 + 1 = 3.
        let mut rng = SequenceRng::new(vec![10]);
        let result = domain_skill_check(&mut rng, 0, 3, 25, Advantage::Normal);
        assert_eq!(result.bonus, 3);
        assert!(!result.success);
    }
}
