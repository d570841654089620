//! Command handlers for the Military Unit context.
//!
//! Each handler follows the same shape: load the unit from the key-value
//! store, apply the immutable-update mutator, persist the returned value,
//! and hand the new state back to the caller.

use tracing::{info, instrument};
use warmarch_core::clock::Clock;
use warmarch_core::error::EngineError;
use warmarch_core::store::{KeyValueStore, require_record, save_record};

use crate::domain::commands::{
    AwardExperience, CreateUnit, ModifyCondition, ModifyTrait, RallyCasualties, TakeCasualties,
};
use crate::domain::unit::Unit;

/// Musters a new unit and persists it.
///
/// # Errors
///
/// Returns `EngineError` on serialization or storage failure.
#[instrument(skip(command, clock, store), fields(unit_id = %command.unit_id, correlation_id = %command.correlation_id))]
pub async fn handle_create_unit(
    command: &CreateUnit,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Unit, EngineError> {
    let unit = Unit::new(
        command.unit_id,
        command.name.clone(),
        command.kind,
        command.tier,
        command.base,
        clock,
    );
    save_record(store, &unit).await?;
    info!(name = %unit.name, "unit mustered");
    Ok(unit)
}

/// Applies casualties to a stored unit.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the unit is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(unit_id = %command.unit_id, correlation_id = %command.correlation_id))]
pub async fn handle_take_casualties(
    command: &TakeCasualties,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Unit, EngineError> {
    let unit: Unit = require_record(store, command.unit_id).await?;
    let unit = unit.take_casualties(command.amount, clock);
    save_record(store, &unit).await?;
    if unit.is_broken() {
        info!(name = %unit.name, "unit broken");
    }
    Ok(unit)
}

/// Rallies a stored unit.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the unit is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(unit_id = %command.unit_id, correlation_id = %command.correlation_id))]
pub async fn handle_rally_casualties(
    command: &RallyCasualties,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Unit, EngineError> {
    let unit: Unit = require_record(store, command.unit_id).await?;
    let unit = unit.rally_casualties(command.amount, clock);
    save_record(store, &unit).await?;
    Ok(unit)
}

/// Adds or removes a trait on a stored unit.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the unit is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(unit_id = %command.unit_id, correlation_id = %command.correlation_id))]
pub async fn handle_modify_trait(
    command: &ModifyTrait,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Unit, EngineError> {
    let unit: Unit = require_record(store, command.unit_id).await?;
    let unit = if command.add {
        unit.add_trait(command.name.clone(), clock)
    } else {
        unit.remove_trait(&command.name, clock)
    };
    save_record(store, &unit).await?;
    Ok(unit)
}

/// Adds or removes a condition on a stored unit.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the unit is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(unit_id = %command.unit_id, correlation_id = %command.correlation_id))]
pub async fn handle_modify_condition(
    command: &ModifyCondition,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Unit, EngineError> {
    let unit: Unit = require_record(store, command.unit_id).await?;
    let unit = if command.add {
        unit.add_condition(command.name.clone(), clock)
    } else {
        unit.remove_condition(&command.name, clock)
    };
    save_record(store, &unit).await?;
    Ok(unit)
}

/// Awards experience to a stored unit.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the unit is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(unit_id = %command.unit_id, correlation_id = %command.correlation_id))]
pub async fn handle_award_experience(
    command: &AwardExperience,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Unit, EngineError> {
    let unit: Unit = require_record(store, command.unit_id).await?;
    let unit = unit.award_experience(command.amount, clock);
    save_record(store, &unit).await?;
    Ok(unit)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;
    use warmarch_core::store::EntityKind;
    use warmarch_test_support::{FailingStore, FixedClock, RecordingStore};

    use super::*;
    use crate::domain::unit::{BaseStats, Tier, UnitType};

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap())
    }

    fn create_command(unit_id: Uuid) -> CreateUnit {
        CreateUnit {
            correlation_id: Uuid::new_v4(),
            unit_id,
            name: "Greycloak Shields".to_owned(),
            kind: UnitType::Infantry,
            tier: Tier::III,
            base: BaseStats::default(),
        }
    }

    #[tokio::test]
    async fn test_create_unit_persists_record_and_index() {
        let store = RecordingStore::new();
        let unit_id = Uuid::new_v4();

        let unit = handle_create_unit(&create_command(unit_id), &fixed_clock(), &store)
            .await
            .unwrap();

        assert_eq!(unit.id, unit_id);
        assert!(store.value(&EntityKind::Unit.record_key(unit_id)).is_some());
        let index = store.value(EntityKind::Unit.index_key()).unwrap();
        assert_eq!(index, serde_json::json!([unit_id]));
    }

    #[tokio::test]
    async fn test_take_casualties_round_trips_through_store() {
        let store = RecordingStore::new();
        let unit_id = Uuid::new_v4();
        handle_create_unit(&create_command(unit_id), &fixed_clock(), &store)
            .await
            .unwrap();

        let command = TakeCasualties {
            correlation_id: Uuid::new_v4(),
            unit_id,
            amount: 2,
        };
        let unit = handle_take_casualties(&command, &fixed_clock(), &store)
            .await
            .unwrap();
        assert_eq!(unit.casualty_die.current, 1);

        let stored: Unit = serde_json::from_value(
            store.value(&EntityKind::Unit.record_key(unit_id)).unwrap(),
        )
        .unwrap();
        assert_eq!(stored.casualty_die.current, 1);
    }

    #[tokio::test]
    async fn test_mutating_missing_unit_reports_not_found() {
        let store = RecordingStore::new();
        let command = RallyCasualties {
            correlation_id: Uuid::new_v4(),
            unit_id: Uuid::new_v4(),
            amount: 1,
        };

        let err = handle_rally_casualties(&command, &fixed_clock(), &store)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::EntityNotFound { .. }));
        assert!(store.put_keys().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let command = create_command(Uuid::new_v4());
        let err = handle_create_unit(&command, &fixed_clock(), &FailingStore)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Storage(_)));
    }

    #[tokio::test]
    async fn test_modify_trait_adds_and_removes() {
        let store = RecordingStore::new();
        let unit_id = Uuid::new_v4();
        handle_create_unit(&create_command(unit_id), &fixed_clock(), &store)
            .await
            .unwrap();

        let add = ModifyTrait {
            correlation_id: Uuid::new_v4(),
            unit_id,
            name: "stalwart".to_owned(),
            add: true,
        };
        let unit = handle_modify_trait(&add, &fixed_clock(), &store)
            .await
            .unwrap();
        assert!(unit.traits.contains("stalwart"));

        let remove = ModifyTrait {
            add: false,
            ..add
        };
        let unit = handle_modify_trait(&remove, &fixed_clock(), &store)
            .await
            .unwrap();
        assert!(unit.traits.is_empty());
    }
}
