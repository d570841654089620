//! Command handlers for the Political Domain context.

use tracing::{info, instrument};
use warmarch_core::clock::Clock;
use warmarch_core::error::EngineError;
use warmarch_core::store::{KeyValueStore, require_record, save_record};

use crate::domain::commands::{
    AdjustDefenseLevel, AdjustResources, AssignOfficer, AssignUnit, CreateDomain, UpdateSkills,
};
use crate::domain::realm::Domain;

/// Founds a new domain and persists it.
///
/// # Errors
///
/// Returns `EngineError` on serialization or storage failure.
#[instrument(skip(command, clock, store), fields(domain_id = %command.domain_id, correlation_id = %command.correlation_id))]
pub async fn handle_create_domain(
    command: &CreateDomain,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Domain, EngineError> {
    let domain = Domain::new(
        command.domain_id,
        command.name.clone(),
        command.size,
        command.skills,
        clock,
    );
    save_record(store, &domain).await?;
    info!(name = %domain.name, size = domain.size.rank(), "domain founded");
    Ok(domain)
}

/// Applies a partial skill change, recomputing defense scores.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the domain is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(domain_id = %command.domain_id, correlation_id = %command.correlation_id))]
pub async fn handle_update_skills(
    command: &UpdateSkills,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Domain, EngineError> {
    let domain: Domain = require_record(store, command.domain_id).await?;
    let domain = domain.update_skills(command.update, clock);
    save_record(store, &domain).await?;
    Ok(domain)
}

/// Adds or spends domain resources.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the domain is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(domain_id = %command.domain_id, correlation_id = %command.correlation_id))]
pub async fn handle_adjust_resources(
    command: &AdjustResources,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Domain, EngineError> {
    let domain: Domain = require_record(store, command.domain_id).await?;
    let domain = if command.add {
        domain.add_resources(command.amount, clock)
    } else {
        domain.remove_resources(command.amount, clock)
    };
    save_record(store, &domain).await?;
    Ok(domain)
}

/// Adjusts one defense-level counter.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the domain is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(domain_id = %command.domain_id, correlation_id = %command.correlation_id))]
pub async fn handle_adjust_defense_level(
    command: &AdjustDefenseLevel,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Domain, EngineError> {
    let domain: Domain = require_record(store, command.domain_id).await?;
    let domain = domain.adjust_defense_level(command.defense, command.delta, clock);
    save_record(store, &domain).await?;
    Ok(domain)
}

/// Attaches or detaches a unit.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the domain is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(domain_id = %command.domain_id, correlation_id = %command.correlation_id))]
pub async fn handle_assign_unit(
    command: &AssignUnit,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Domain, EngineError> {
    let domain: Domain = require_record(store, command.domain_id).await?;
    let domain = if command.attach {
        domain.add_unit(command.unit_id, clock)
    } else {
        domain.remove_unit(command.unit_id, clock)
    };
    save_record(store, &domain).await?;
    Ok(domain)
}

/// Attaches or detaches an officer.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the domain is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(domain_id = %command.domain_id, correlation_id = %command.correlation_id))]
pub async fn handle_assign_officer(
    command: &AssignOfficer,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Domain, EngineError> {
    let domain: Domain = require_record(store, command.domain_id).await?;
    let domain = if command.attach {
        domain.add_officer(command.officer_id, clock)
    } else {
        domain.remove_officer(command.officer_id, clock)
    };
    save_record(store, &domain).await?;
    Ok(domain)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;
    use warmarch_core::store::EntityKind;
    use warmarch_test_support::{FixedClock, RecordingStore};

    use super::*;
    use crate::domain::realm::{DomainSize, SkillSet, SkillUpdate};

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap())
    }

    async fn seeded_domain(store: &RecordingStore) -> Domain {
        let command = CreateDomain {
            correlation_id: Uuid::new_v4(),
            domain_id: Uuid::new_v4(),
            name: "Varn".to_owned(),
            size: DomainSize::clamped(3),
            skills: SkillSet {
                diplomacy: 2,
                espionage: 1,
                lore: 0,
                operations: 4,
            },
        };
        handle_create_domain(&command, &fixed_clock(), store)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_domain_persists_record_and_index() {
        let store = RecordingStore::new();
        let domain = seeded_domain(&store).await;

        assert!(
            store
                .value(&EntityKind::Domain.record_key(domain.id))
                .is_some()
        );
        let index = store.value(EntityKind::Domain.index_key()).unwrap();
        assert_eq!(index, serde_json::json!([domain.id]));
    }

    #[tokio::test]
    async fn test_update_skills_persists_recomputed_scores() {
        let store = RecordingStore::new();
        let domain = seeded_domain(&store).await;

        let command = UpdateSkills {
            correlation_id: Uuid::new_v4(),
            domain_id: domain.id,
            update: SkillUpdate {
                espionage: Some(5),
                ..SkillUpdate::default()
            },
        };
        let updated = handle_update_skills(&command, &fixed_clock(), &store)
            .await
            .unwrap();

        let stored: Domain = serde_json::from_value(
            store
                .value(&EntityKind::Domain.record_key(domain.id))
                .unwrap(),
        )
        .unwrap();
        assert_eq!(stored.defense_scores, updated.defense_scores);
        assert_eq!(stored.defense_scores.communications, 13);
    }

    #[tokio::test]
    async fn test_adjust_resources_spend_clamps_at_zero() {
        let store = RecordingStore::new();
        let domain = seeded_domain(&store).await;

        let command = AdjustResources {
            correlation_id: Uuid::new_v4(),
            domain_id: domain.id,
            amount: 7,
            add: false,
        };
        let updated = handle_adjust_resources(&command, &fixed_clock(), &store)
            .await
            .unwrap();
        assert_eq!(updated.resources, 0);
    }

    #[tokio::test]
    async fn test_missing_domain_reports_not_found() {
        let store = RecordingStore::new();
        let command = UpdateSkills {
            correlation_id: Uuid::new_v4(),
            domain_id: Uuid::new_v4(),
            update: SkillUpdate::default(),
        };

        let err = handle_update_skills(&command, &fixed_clock(), &store)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::EntityNotFound { .. }));
    }
}
