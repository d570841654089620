//! Typed repository façade.
//!
//! Thin, kind-aware wrappers over the core record helpers, plus the one
//! genuinely cross-entity operation: deleting a unit also strips its id from
//! every stored domain's unit list and removes it from every stored battle.

use tracing::{debug, instrument};
use uuid::Uuid;
use warmarch_battle::domain::battle::Battle;
use warmarch_core::clock::Clock;
use warmarch_core::error::EngineError;
use warmarch_core::store::{
    EntityKind, KeyValueStore, delete_record, list_ids, load_record, require_record, save_record,
};
use warmarch_domains::domain::realm::Domain;
use warmarch_intrigue::domain::session::Intrigue;
use warmarch_units::domain::unit::Unit;

/// Typed persistence façade over a key-value store.
pub struct GameRepository<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> GameRepository<'a> {
    /// Wraps a key-value store.
    #[must_use]
    pub const fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Persists a unit.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` on serialization or storage failure.
    pub async fn save_unit(&self, unit: &Unit) -> Result<(), EngineError> {
        save_record(self.store, unit).await
    }

    /// Loads a unit, failing if it is not stored.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::EntityNotFound` if no record exists.
    pub async fn require_unit(&self, id: Uuid) -> Result<Unit, EngineError> {
        require_record(self.store, id).await
    }

    /// Ids of every stored unit, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` on storage failure.
    pub async fn list_units(&self) -> Result<Vec<Uuid>, EngineError> {
        list_ids(self.store, EntityKind::Unit).await
    }

    /// Persists a domain.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` on serialization or storage failure.
    pub async fn save_domain(&self, domain: &Domain) -> Result<(), EngineError> {
        save_record(self.store, domain).await
    }

    /// Loads a domain, failing if it is not stored.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::EntityNotFound` if no record exists.
    pub async fn require_domain(&self, id: Uuid) -> Result<Domain, EngineError> {
        require_record(self.store, id).await
    }

    /// Ids of every stored domain, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` on storage failure.
    pub async fn list_domains(&self) -> Result<Vec<Uuid>, EngineError> {
        list_ids(self.store, EntityKind::Domain).await
    }

    /// Deletes a domain record and its index entry.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` on storage failure.
    pub async fn delete_domain(&self, id: Uuid) -> Result<(), EngineError> {
        delete_record(self.store, EntityKind::Domain, id).await
    }

    /// Persists a battle.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` on serialization or storage failure.
    pub async fn save_battle(&self, battle: &Battle) -> Result<(), EngineError> {
        save_record(self.store, battle).await
    }

    /// Loads a battle, failing if it is not stored.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::EntityNotFound` if no record exists.
    pub async fn require_battle(&self, id: Uuid) -> Result<Battle, EngineError> {
        require_record(self.store, id).await
    }

    /// Ids of every stored battle, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` on storage failure.
    pub async fn list_battles(&self) -> Result<Vec<Uuid>, EngineError> {
        list_ids(self.store, EntityKind::Battle).await
    }

    /// Deletes a battle record and its index entry.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` on storage failure.
    pub async fn delete_battle(&self, id: Uuid) -> Result<(), EngineError> {
        delete_record(self.store, EntityKind::Battle, id).await
    }

    /// Persists an intrigue session.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` on serialization or storage failure.
    pub async fn save_intrigue(&self, session: &Intrigue) -> Result<(), EngineError> {
        save_record(self.store, session).await
    }

    /// Loads an intrigue session, failing if it is not stored.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::EntityNotFound` if no record exists.
    pub async fn require_intrigue(&self, id: Uuid) -> Result<Intrigue, EngineError> {
        require_record(self.store, id).await
    }

    /// Ids of every stored intrigue session, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` on storage failure.
    pub async fn list_intrigues(&self) -> Result<Vec<Uuid>, EngineError> {
        list_ids(self.store, EntityKind::Intrigue).await
    }

    /// Deletes an intrigue record and its index entry.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` on storage failure.
    pub async fn delete_intrigue(&self, id: Uuid) -> Result<(), EngineError> {
        delete_record(self.store, EntityKind::Intrigue, id).await
    }

    /// Deletes a unit everywhere: its record and index entry, its id in
    /// every stored domain's unit list, and its presence (grid slot,
    /// initiative entry, battle state) in every stored battle.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` on serialization or storage failure.
    #[instrument(skip(self, clock), fields(unit_id = %unit_id))]
    pub async fn delete_unit(&self, unit_id: Uuid, clock: &dyn Clock) -> Result<(), EngineError> {
        delete_record(self.store, EntityKind::Unit, unit_id).await?;

        for domain_id in self.list_domains().await? {
            if let Some(domain) = load_record::<Domain>(self.store, domain_id).await?
                && domain.units.contains(&unit_id)
            {
                self.save_domain(&domain.remove_unit(unit_id, clock)).await?;
                debug!(%domain_id, "unit stripped from domain");
            }
        }

        for battle_id in self.list_battles().await? {
            if let Some(battle) = load_record::<Battle>(self.store, battle_id).await? {
                let transition = battle.remove_unit(unit_id, clock);
                if transition.was_applied() {
                    self.save_battle(&transition.state).await?;
                    debug!(%battle_id, "unit removed from battle");
                }
            }
        }
        Ok(())
    }
}
