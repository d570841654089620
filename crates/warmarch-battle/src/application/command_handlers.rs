//! Command handlers for the Warfare Battle engine.
//!
//! Handlers load the battle from the key-value store, run the requested
//! transition, and persist the new state — but only when the transition was
//! applied. A rejected transition persists nothing and is returned to the
//! caller with its reason.

use tracing::{debug, info, instrument};
use uuid::Uuid;
use warmarch_core::clock::Clock;
use warmarch_core::error::EngineError;
use warmarch_core::store::{KeyValueStore, require_record, save_record};
use warmarch_core::transition::Transition;

use crate::domain::battle::Battle;
use crate::domain::commands::{
    ActivateUnit, AddDomain, AddToken, AddUnit, CreateBattle, DeployUnit, EndBattle, EndTurn,
    LogNote, RemoveDomain, RemoveToken, RemoveUnit, SetInitiative, StartBattle, UseReaction,
};

async fn apply<F>(
    battle_id: Uuid,
    store: &dyn KeyValueStore,
    op: F,
) -> Result<Transition<Battle>, EngineError>
where
    F: FnOnce(Battle) -> Transition<Battle>,
{
    let battle: Battle = require_record(store, battle_id).await?;
    let transition = op(battle);
    match transition.rejection() {
        None => save_record(store, &transition.state).await?,
        Some(reason) => debug!(%reason, "transition rejected, nothing persisted"),
    }
    Ok(transition)
}

async fn persist<F>(
    battle_id: Uuid,
    store: &dyn KeyValueStore,
    op: F,
) -> Result<Battle, EngineError>
where
    F: FnOnce(Battle) -> Battle,
{
    let battle: Battle = require_record(store, battle_id).await?;
    let battle = op(battle);
    save_record(store, &battle).await?;
    Ok(battle)
}

/// Opens a new battle in setup and persists it.
///
/// # Errors
///
/// Returns `EngineError` on serialization or storage failure.
#[instrument(skip(command, clock, store), fields(battle_id = %command.battle_id, correlation_id = %command.correlation_id))]
pub async fn handle_create_battle(
    command: &CreateBattle,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Battle, EngineError> {
    let battle = Battle::new(command.battle_id, command.name.clone(), clock);
    save_record(store, &battle).await?;
    info!(name = %battle.name, "battle opened");
    Ok(battle)
}

/// Adds a domain to a stored battle.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the battle is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(battle_id = %command.battle_id, correlation_id = %command.correlation_id))]
pub async fn handle_add_domain(
    command: &AddDomain,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Battle, EngineError> {
    persist(command.battle_id, store, |battle| {
        battle.add_domain(command.domain_id, clock)
    })
    .await
}

/// Removes a domain and its units from a stored battle.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the battle is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(battle_id = %command.battle_id, correlation_id = %command.correlation_id))]
pub async fn handle_remove_domain(
    command: &RemoveDomain,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Battle, EngineError> {
    persist(command.battle_id, store, |battle| {
        battle.remove_domain(command.domain_id, clock)
    })
    .await
}

/// Adds a unit to a stored battle.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the battle is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(battle_id = %command.battle_id, correlation_id = %command.correlation_id))]
pub async fn handle_add_unit(
    command: &AddUnit,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Transition<Battle>, EngineError> {
    apply(command.battle_id, store, |battle| {
        battle.add_unit(command.unit_id, command.domain_id, clock)
    })
    .await
}

/// Removes a unit from a stored battle.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the battle is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(battle_id = %command.battle_id, correlation_id = %command.correlation_id))]
pub async fn handle_remove_unit(
    command: &RemoveUnit,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Transition<Battle>, EngineError> {
    apply(command.battle_id, store, |battle| {
        battle.remove_unit(command.unit_id, clock)
    })
    .await
}

/// Deploys a unit on a stored battle's grid.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the battle is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(battle_id = %command.battle_id, correlation_id = %command.correlation_id))]
pub async fn handle_deploy_unit(
    command: &DeployUnit,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Transition<Battle>, EngineError> {
    apply(command.battle_id, store, |battle| {
        battle.deploy_unit(command.unit_id, command.position, clock)
    })
    .await
}

/// Replaces a stored battle's initiative order.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the battle is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(battle_id = %command.battle_id, correlation_id = %command.correlation_id))]
pub async fn handle_set_initiative(
    command: &SetInitiative,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Battle, EngineError> {
    persist(command.battle_id, store, |battle| {
        battle.set_initiative(command.order.clone(), clock)
    })
    .await
}

/// Starts a stored battle.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the battle is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(battle_id = %command.battle_id, correlation_id = %command.correlation_id))]
pub async fn handle_start_battle(
    command: &StartBattle,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Transition<Battle>, EngineError> {
    apply(command.battle_id, store, |battle| battle.start(clock)).await
}

/// Ends a stored battle.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the battle is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(battle_id = %command.battle_id, correlation_id = %command.correlation_id))]
pub async fn handle_end_battle(
    command: &EndBattle,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Transition<Battle>, EngineError> {
    apply(command.battle_id, store, |battle| {
        battle.end(command.winner, clock)
    })
    .await
}

/// Activates a unit on its turn.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the battle is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(battle_id = %command.battle_id, correlation_id = %command.correlation_id))]
pub async fn handle_activate_unit(
    command: &ActivateUnit,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Transition<Battle>, EngineError> {
    apply(command.battle_id, store, |battle| {
        battle.activate_unit(command.unit_id, clock)
    })
    .await
}

/// Spends a unit's reaction for the round.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the battle is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(battle_id = %command.battle_id, correlation_id = %command.correlation_id))]
pub async fn handle_use_reaction(
    command: &UseReaction,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Transition<Battle>, EngineError> {
    apply(command.battle_id, store, |battle| {
        battle.use_reaction(command.unit_id, clock)
    })
    .await
}

/// Ends the current turn.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the battle is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(battle_id = %command.battle_id, correlation_id = %command.correlation_id))]
pub async fn handle_end_turn(
    command: &EndTurn,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Transition<Battle>, EngineError> {
    apply(command.battle_id, store, |battle| battle.end_turn(clock)).await
}

/// Adds a token to a unit.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the battle is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(battle_id = %command.battle_id, correlation_id = %command.correlation_id))]
pub async fn handle_add_token(
    command: &AddToken,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Transition<Battle>, EngineError> {
    apply(command.battle_id, store, |battle| {
        battle.add_token(command.unit_id, command.token.clone(), clock)
    })
    .await
}

/// Removes every matching token from a unit.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the battle is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(battle_id = %command.battle_id, correlation_id = %command.correlation_id))]
pub async fn handle_remove_token(
    command: &RemoveToken,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Transition<Battle>, EngineError> {
    apply(command.battle_id, store, |battle| {
        battle.remove_token(command.unit_id, &command.token, clock)
    })
    .await
}

/// Appends a free-form narrative entry to a stored battle's log.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the battle is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(battle_id = %command.battle_id, correlation_id = %command.correlation_id))]
pub async fn handle_log_note(
    command: &LogNote,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Battle, EngineError> {
    persist(command.battle_id, store, |battle| {
        battle.note(command.message.clone(), clock)
    })
    .await
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use warmarch_core::store::EntityKind;
    use warmarch_core::transition::Rejection;
    use warmarch_test_support::{FixedClock, RecordingStore};

    use super::*;
    use crate::domain::grid::{Column, Position, Rank};

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap())
    }

    async fn seeded_battle(store: &RecordingStore) -> Battle {
        let command = CreateBattle {
            correlation_id: Uuid::new_v4(),
            battle_id: Uuid::new_v4(),
            name: "Siege of Varn".to_owned(),
        };
        handle_create_battle(&command, &fixed_clock(), store)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_battle_persists_record_and_index() {
        let store = RecordingStore::new();
        let battle = seeded_battle(&store).await;

        assert!(
            store
                .value(&EntityKind::Battle.record_key(battle.id))
                .is_some()
        );
        let index = store.value(EntityKind::Battle.index_key()).unwrap();
        assert_eq!(index, serde_json::json!([battle.id]));
    }

    #[tokio::test]
    async fn test_applied_transition_is_persisted() {
        let store = RecordingStore::new();
        let battle = seeded_battle(&store).await;
        let unit_id = Uuid::new_v4();

        let command = AddUnit {
            correlation_id: Uuid::new_v4(),
            battle_id: battle.id,
            unit_id,
            domain_id: Uuid::new_v4(),
        };
        let transition = handle_add_unit(&command, &fixed_clock(), &store)
            .await
            .unwrap();
        assert!(transition.was_applied());

        let stored: Battle = serde_json::from_value(
            store
                .value(&EntityKind::Battle.record_key(battle.id))
                .unwrap(),
        )
        .unwrap();
        assert!(stored.units.contains_key(&unit_id));
    }

    #[tokio::test]
    async fn test_rejected_transition_persists_nothing() {
        let store = RecordingStore::new();
        let battle = seeded_battle(&store).await;
        let writes_before = store.put_keys().len();

        // Deploying an unknown unit is rejected and must not write.
        let command = DeployUnit {
            correlation_id: Uuid::new_v4(),
            battle_id: battle.id,
            unit_id: Uuid::new_v4(),
            position: Position::Cell {
                rank: Rank::Vanguard,
                column: Column::Left,
            },
        };
        let transition = handle_deploy_unit(&command, &fixed_clock(), &store)
            .await
            .unwrap();
        assert_eq!(transition.rejection(), Some(Rejection::UnknownUnit));
        assert_eq!(store.put_keys().len(), writes_before);
    }

    #[tokio::test]
    async fn test_missing_battle_reports_not_found() {
        let store = RecordingStore::new();
        let command = EndTurn {
            correlation_id: Uuid::new_v4(),
            battle_id: Uuid::new_v4(),
        };

        let err = handle_end_turn(&command, &fixed_clock(), &store)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::EntityNotFound { .. }));
    }

    #[tokio::test]
    async fn test_start_then_end_round_trips_through_store() {
        let store = RecordingStore::new();
        let clock = fixed_clock();
        let battle = seeded_battle(&store).await;
        let winner = Uuid::new_v4();

        let start = StartBattle {
            correlation_id: Uuid::new_v4(),
            battle_id: battle.id,
        };
        assert!(
            handle_start_battle(&start, &clock, &store)
                .await
                .unwrap()
                .was_applied()
        );

        let end = EndBattle {
            correlation_id: Uuid::new_v4(),
            battle_id: battle.id,
            winner: Some(winner),
        };
        let transition = handle_end_battle(&end, &clock, &store).await.unwrap();
        assert!(transition.was_applied());
        assert_eq!(
            transition.state.phase,
            crate::domain::battle::BattlePhase::Aftermath
        );
    }
}
