//! Commands for the Warfare Battle engine.

use uuid::Uuid;
use warmarch_core::command::Command;

use super::grid::Position;

macro_rules! battle_command {
    ($(#[$doc:meta])* $name:ident, $command_type:literal $(, $(#[$field_doc:meta])* $field:ident : $ty:ty)* $(,)?) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            /// The correlation ID for tracing.
            pub correlation_id: Uuid,
            /// The battle to operate on.
            pub battle_id: Uuid,
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

battle_command!(
    /// Command to open a new battle in setup.
    CreateBattle,
    "battle.create_battle",
    /// Display name.
    name: String,
);

battle_command!(
    /// Command to add a domain to the battle.
    AddDomain,
    "battle.add_domain",
    /// The domain joining.
    domain_id: Uuid,
);

battle_command!(
    /// Command to remove a domain and every unit fighting for it.
    RemoveDomain,
    "battle.remove_domain",
    /// The domain leaving.
    domain_id: Uuid,
);

battle_command!(
    /// Command to add a unit fighting for a domain.
    AddUnit,
    "battle.add_unit",
    /// The unit joining.
    unit_id: Uuid,
    /// The domain it fights for.
    domain_id: Uuid,
);

battle_command!(
    /// Command to remove a unit from the battle.
    RemoveUnit,
    "battle.remove_unit",
    /// The unit leaving.
    unit_id: Uuid,
);

battle_command!(
    /// Command to move a unit to a grid position.
    DeployUnit,
    "battle.deploy_unit",
    /// The unit deploying.
    unit_id: Uuid,
    /// The target position.
    position: Position,
);

battle_command!(
    /// Command to replace the initiative order wholesale.
    SetInitiative,
    "battle.set_initiative",
    /// The new order, first to act first.
    order: Vec<Uuid>,
);

battle_command!(
    /// Command to start the battle.
    StartBattle,
    "battle.start_battle",
);

battle_command!(
    /// Command to end the battle.
    EndBattle,
    "battle.end_battle",
    /// The winning domain, if one was determined.
    winner: Option<Uuid>,
);

battle_command!(
    /// Command to activate a unit on its turn.
    ActivateUnit,
    "battle.activate_unit",
    /// The unit activating.
    unit_id: Uuid,
);

battle_command!(
    /// Command to spend a unit's reaction.
    UseReaction,
    "battle.use_reaction",
    /// The unit reacting.
    unit_id: Uuid,
);

battle_command!(
    /// Command to end the current turn.
    EndTurn,
    "battle.end_turn",
);

battle_command!(
    /// Command to add a token to a unit.
    AddToken,
    "battle.add_token",
    /// The unit tagged.
    unit_id: Uuid,
    /// The token value.
    token: String,
);

battle_command!(
    /// Command to remove every matching token from a unit.
    RemoveToken,
    "battle.remove_token",
    /// The unit untagged.
    unit_id: Uuid,
    /// The token value.
    token: String,
);

battle_command!(
    /// Command to append a free-form narrative entry to the log.
    LogNote,
    "battle.log_note",
    /// The entry text.
    message: String,
);
