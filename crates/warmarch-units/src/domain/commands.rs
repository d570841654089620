//! Commands for the Military Unit context.

use uuid::Uuid;
use warmarch_core::command::Command;

use super::unit::{BaseStats, Tier, UnitType};

/// Command to muster a new unit.
#[derive(Debug, Clone)]
pub struct CreateUnit {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The identifier for the new unit.
    pub unit_id: Uuid,
    /// Display name.
    pub name: String,
    /// Unit type.
    pub kind: UnitType,
    /// Unit tier.
    pub tier: Tier,
    /// Base stats (defaults apply for a fresh levy).
    pub base: BaseStats,
}

impl Command for CreateUnit {
    fn command_type(&self) -> &'static str {
        "units.create_unit"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to apply casualties to a unit.
#[derive(Debug, Clone)]
pub struct TakeCasualties {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The unit taking casualties.
    pub unit_id: Uuid,
    /// Points of casualty die to remove.
    pub amount: u32,
}

impl Command for TakeCasualties {
    fn command_type(&self) -> &'static str {
        "units.take_casualties"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to rally a unit, restoring casualty die points.
#[derive(Debug, Clone)]
pub struct RallyCasualties {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The unit rallying.
    pub unit_id: Uuid,
    /// Points of casualty die to restore.
    pub amount: u32,
}

impl Command for RallyCasualties {
    fn command_type(&self) -> &'static str {
        "units.rally_casualties"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to add or remove a trait.
#[derive(Debug, Clone)]
pub struct ModifyTrait {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The unit to modify.
    pub unit_id: Uuid,
    /// The trait name.
    pub name: String,
    /// `true` to add, `false` to remove.
    pub add: bool,
}

impl Command for ModifyTrait {
    fn command_type(&self) -> &'static str {
        "units.modify_trait"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to add or remove a condition.
#[derive(Debug, Clone)]
pub struct ModifyCondition {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The unit to modify.
    pub unit_id: Uuid,
    /// The condition name.
    pub name: String,
    /// `true` to add, `false` to remove.
    pub add: bool,
}

impl Command for ModifyCondition {
    fn command_type(&self) -> &'static str {
        "units.modify_condition"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to award experience after a battle.
#[derive(Debug, Clone)]
pub struct AwardExperience {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The unit to reward.
    pub unit_id: Uuid,
    /// Experience points to add.
    pub amount: u32,
}

impl Command for AwardExperience {
    fn command_type(&self) -> &'static str {
        "units.award_experience"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
