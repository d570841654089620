//! Query handlers for the Warfare Battle engine.
//!
//! Read-only view DTOs rendered from a stored battle, shaped for the
//! formatting layer.

use serde::Serialize;
use uuid::Uuid;
use warmarch_core::error::EngineError;
use warmarch_core::store::{KeyValueStore, require_record};

use crate::domain::battle::Battle;
use crate::domain::events::BattleLogEntry;
use crate::domain::grid::Position;

/// Read-only view of one participating unit.
#[derive(Debug, Serialize)]
pub struct UnitStateView {
    /// The unit identifier.
    pub unit_id: Uuid,
    /// The domain it fights for.
    pub domain_id: Uuid,
    /// Where it stands.
    pub position: Position,
    /// Whether it has activated this turn.
    pub activated: bool,
    /// Whether its reaction is spent this round.
    pub used_reaction: bool,
    /// Tokens on the unit.
    pub tokens: Vec<String>,
}

/// Read-only view of a battle.
#[derive(Debug, Serialize)]
pub struct BattleView {
    /// The battle identifier.
    pub battle_id: Uuid,
    /// Display name.
    pub name: String,
    /// Current phase as a string.
    pub phase: String,
    /// Current round.
    pub round: u32,
    /// Participating domains.
    pub domains: Vec<Uuid>,
    /// The unit whose turn it is, if initiative has been set.
    pub current_unit: Option<Uuid>,
    /// The activation order.
    pub initiative: Vec<Uuid>,
    /// Per-unit state.
    pub units: Vec<UnitStateView>,
    /// The full event log.
    pub log: Vec<BattleLogEntry>,
}

/// Retrieves a battle view by id.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if no battle is stored under the
/// id, or a serialization/storage error.
pub async fn get_battle_by_id(
    battle_id: Uuid,
    store: &dyn KeyValueStore,
) -> Result<BattleView, EngineError> {
    let battle: Battle = require_record(store, battle_id).await?;

    let units = battle
        .units
        .iter()
        .map(|(unit_id, unit)| UnitStateView {
            unit_id: *unit_id,
            domain_id: unit.domain_id,
            position: unit.position,
            activated: unit.activated,
            used_reaction: unit.used_reaction,
            tokens: unit.tokens.clone(),
        })
        .collect();

    Ok(BattleView {
        battle_id: battle.id,
        name: battle.name.clone(),
        phase: battle.phase.name().to_owned(),
        round: battle.round,
        domains: battle.domains.clone(),
        current_unit: battle.current_unit(),
        initiative: battle.initiative.clone(),
        units,
        log: battle.log,
    })
}
