//! Commands for the Intrigue Session engine.

use uuid::Uuid;
use warmarch_core::command::Command;
use warmarch_dice::roll::Advantage;
use warmarch_domains::domain::realm::DomainSkill;

use super::actions::IntrigueAction;

macro_rules! intrigue_command {
    ($(#[$doc:meta])* $name:ident, $command_type:literal $(, $(#[$field_doc:meta])* $field:ident : $ty:ty)* $(,)?) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            /// The correlation ID for tracing.
            pub correlation_id: Uuid,
            /// The session to operate on.
            pub intrigue_id: Uuid,
            $($(#[$field_doc])* pub $field: $ty,)*
        }

        impl Command for $name {
            fn command_type(&self) -> &'static str {
                $command_type
            }

            fn correlation_id(&self) -> Uuid {
                self.correlation_id
            }
        }
    };
}

intrigue_command!(
    /// Command to open a new intrigue session in setup.
    CreateIntrigue,
    "intrigue.create_intrigue",
    /// Display name.
    name: String,
);

intrigue_command!(
    /// Command to add a domain to the session.
    AddDomain,
    "intrigue.add_domain",
    /// The domain joining.
    domain_id: Uuid,
);

intrigue_command!(
    /// Command to remove a domain from the session.
    RemoveDomain,
    "intrigue.remove_domain",
    /// The domain leaving.
    domain_id: Uuid,
);

intrigue_command!(
    /// Command to set the session initiator.
    SetInitiator,
    "intrigue.set_initiator",
    /// The initiating domain.
    domain_id: Uuid,
);

intrigue_command!(
    /// Command to start the session.
    StartIntrigue,
    "intrigue.start_intrigue",
);

intrigue_command!(
    /// Command to end the session.
    EndIntrigue,
    "intrigue.end_intrigue",
);

intrigue_command!(
    /// Command to take a turn with an already-resolved action.
    TakeTurn,
    "intrigue.take_turn",
    /// The acting domain.
    domain_id: Uuid,
    /// The action taken.
    action: IntrigueAction,
);

intrigue_command!(
    /// Command to resolve a skill test and take the turn with the result.
    ResolveSkillTest,
    "intrigue.resolve_skill_test",
    /// The acting domain.
    domain_id: Uuid,
    /// The skill tested.
    skill: DomainSkill,
    /// The difficulty number.
    difficulty: i32,
    /// Whether the test rolls with advantage or disadvantage.
    advantage: Advantage,
);

intrigue_command!(
    /// Command to append a free-form narrative entry to the log.
    LogNote,
    "intrigue.log_note",
    /// The entry text.
    message: String,
);
