//! Commands for the Political Domain context.

use uuid::Uuid;
use warmarch_core::command::Command;

use super::realm::{Defense, DomainSize, SkillSet, SkillUpdate};

/// Command to found a new domain.
#[derive(Debug, Clone)]
pub struct CreateDomain {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The identifier for the new domain.
    pub domain_id: Uuid,
    /// Display name.
    pub name: String,
    /// Domain size, 1–5.
    pub size: DomainSize,
    /// Initial skill modifiers.
    pub skills: SkillSet,
}

impl Command for CreateDomain {
    fn command_type(&self) -> &'static str {
        "domains.create_domain"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to apply a partial skill change.
#[derive(Debug, Clone)]
pub struct UpdateSkills {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The domain to modify.
    pub domain_id: Uuid,
    /// The partial change; unset fields keep their current value.
    pub update: SkillUpdate,
}

impl Command for UpdateSkills {
    fn command_type(&self) -> &'static str {
        "domains.update_skills"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to add or spend resources.
#[derive(Debug, Clone)]
pub struct AdjustResources {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The domain to modify.
    pub domain_id: Uuid,
    /// Resources to add (spending clamps at 0).
    pub amount: u32,
    /// `true` to add, `false` to spend.
    pub add: bool,
}

impl Command for AdjustResources {
    fn command_type(&self) -> &'static str {
        "domains.adjust_resources"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to adjust one defense-level counter.
#[derive(Debug, Clone)]
pub struct AdjustDefenseLevel {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The domain to modify.
    pub domain_id: Uuid,
    /// The defense whose level changes.
    pub defense: Defense,
    /// Signed level delta.
    pub delta: i32,
}

impl Command for AdjustDefenseLevel {
    fn command_type(&self) -> &'static str {
        "domains.adjust_defense_level"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to attach or detach a unit.
#[derive(Debug, Clone)]
pub struct AssignUnit {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The domain to modify.
    pub domain_id: Uuid,
    /// The unit changing hands.
    pub unit_id: Uuid,
    /// `true` to attach, `false` to detach.
    pub attach: bool,
}

impl Command for AssignUnit {
    fn command_type(&self) -> &'static str {
        "domains.assign_unit"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to attach or detach an officer.
#[derive(Debug, Clone)]
pub struct AssignOfficer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The domain to modify.
    pub domain_id: Uuid,
    /// The officer changing post.
    pub officer_id: Uuid,
    /// `true` to attach, `false` to detach.
    pub attach: bool,
}

impl Command for AssignOfficer {
    fn command_type(&self) -> &'static str {
        "domains.assign_officer"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
