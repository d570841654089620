//! Intrigue actions.
//!
//! Tagged records describing what a domain did with its turn. Constructors
//! only shape data for the turn record and the formatting layer — resolution
//! (dice) happens in the application layer before the action reaches the
//! session.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use warmarch_dice::check::CheckResult;
use warmarch_domains::domain::realm::{Defense, DomainSkill};
use warmarch_units::domain::unit::{Tier, UnitType};

/// The stored outcome of a resolved skill test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTestResult {
    /// The kept natural roll.
    pub roll: u32,
    /// Skill modifier plus proficiency.
    pub bonus: i32,
    /// `roll + bonus`.
    pub total: i32,
    /// The difficulty the test was made against.
    pub difficulty: i32,
    /// Whether the test succeeded.
    pub success: bool,
}

impl From<CheckResult> for SkillTestResult {
    fn from(check: CheckResult) -> Self {
        Self {
            roll: check.roll,
            bonus: check.bonus,
            total: check.total,
            difficulty: check.dc,
            success: check.success,
        }
    }
}

/// What a domain did with its turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IntrigueAction {
    /// A test of one domain skill against a difficulty.
    SkillTest {
        /// The skill tested.
        skill: DomainSkill,
        /// The difficulty number.
        difficulty: i32,
        /// The outcome, once resolved.
        result: Option<SkillTestResult>,
    },
    /// A change to a defense level, optionally on another domain.
    DefenseModification {
        /// The defense affected.
        defense: Defense,
        /// Signed level change.
        amount: i32,
        /// The affected domain; the acting domain when absent.
        target: Option<Uuid>,
    },
    /// Resources moving between domains.
    ResourceTransfer {
        /// The paying domain.
        from: Uuid,
        /// The receiving domain.
        to: Uuid,
        /// Resources moved.
        amount: u32,
    },
    /// A new unit being mustered.
    UnitCreation {
        /// The unit's name.
        name: String,
        /// The unit's type.
        unit_type: UnitType,
        /// The unit's tier.
        tier: Tier,
    },
    /// A change to an existing unit.
    UnitModification {
        /// The unit changed.
        unit_id: Uuid,
        /// What changed.
        description: String,
    },
    /// Anything the other variants cannot express.
    Special {
        /// What happened.
        description: String,
    },
}

impl IntrigueAction {
    /// An unresolved skill test.
    #[must_use]
    pub const fn skill_test(skill: DomainSkill, difficulty: i32) -> Self {
        Self::SkillTest {
            skill,
            difficulty,
            result: None,
        }
    }

    /// A defense-level modification.
    #[must_use]
    pub const fn defense_modification(defense: Defense, amount: i32, target: Option<Uuid>) -> Self {
        Self::DefenseModification {
            defense,
            amount,
            target,
        }
    }

    /// A resource transfer.
    #[must_use]
    pub const fn resource_transfer(from: Uuid, to: Uuid, amount: u32) -> Self {
        Self::ResourceTransfer { from, to, amount }
    }

    /// A unit-creation action.
    #[must_use]
    pub fn unit_creation(name: impl Into<String>, unit_type: UnitType, tier: Tier) -> Self {
        Self::UnitCreation {
            name: name.into(),
            unit_type,
            tier,
        }
    }

    /// A unit-modification action.
    #[must_use]
    pub fn unit_modification(unit_id: Uuid, description: impl Into<String>) -> Self {
        Self::UnitModification {
            unit_id,
            description: description.into(),
        }
    }

    /// A special action.
    #[must_use]
    pub fn special(description: impl Into<String>) -> Self {
        Self::Special {
            description: description.into(),
        }
    }

    /// Attaches a resolved outcome to a skill test; other variants are
    /// returned unchanged.
    #[must_use]
    pub fn resolved(self, outcome: SkillTestResult) -> Self {
        match self {
            Self::SkillTest {
                skill, difficulty, ..
            } => Self::SkillTest {
                skill,
                difficulty,
                result: Some(outcome),
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_serialize_with_type_discriminator() {
        let action = IntrigueAction::skill_test(DomainSkill::Espionage, 15);
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["type"], serde_json::json!("skill_test"));
        assert_eq!(value["skill"], serde_json::json!("espionage"));
        assert_eq!(value["result"], serde_json::Value::Null);

        let action = IntrigueAction::special("Forged letters reach the court.");
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["type"], serde_json::json!("special"));
    }

    #[test]
    fn test_resolved_fills_skill_test_result() {
        let action = IntrigueAction::skill_test(DomainSkill::Lore, 12).resolved(SkillTestResult {
            roll: 14,
            bonus: 5,
            total: 19,
            difficulty: 12,
            success: true,
        });
        match action {
            IntrigueAction::SkillTest { result, .. } => {
                assert!(result.unwrap().success);
            }
            other => panic!("expected SkillTest, got {other:?}"),
        }
    }

    #[test]
    fn test_resolved_leaves_other_variants_alone() {
        let action = IntrigueAction::resource_transfer(Uuid::new_v4(), Uuid::new_v4(), 3);
        let resolved = action.clone().resolved(SkillTestResult {
            roll: 1,
            bonus: 0,
            total: 1,
            difficulty: 10,
            success: false,
        });
        assert_eq!(resolved, action);
    }
}
