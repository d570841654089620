//! Command handlers for the Intrigue Session engine.
//!
//! Same discipline as the battle handlers: load, transition, persist only
//! when applied. `handle_resolve_skill_test` is the one cross-context
//! composite — it reads the acting domain, resolves the dice check, and
//! takes the turn with the resolved action attached.

use std::sync::Mutex;

use tracing::{debug, info, instrument};
use uuid::Uuid;
use warmarch_core::clock::Clock;
use warmarch_core::error::EngineError;
use warmarch_core::rng::DeterministicRng;
use warmarch_core::store::{KeyValueStore, require_record, save_record};
use warmarch_core::transition::Transition;
use warmarch_dice::check::domain_skill_check;
use warmarch_domains::domain::realm::Domain;

use crate::domain::actions::{IntrigueAction, SkillTestResult};
use crate::domain::commands::{
    AddDomain, CreateIntrigue, EndIntrigue, LogNote, RemoveDomain, ResolveSkillTest, SetInitiator,
    StartIntrigue, TakeTurn,
};
use crate::domain::session::Intrigue;

async fn apply<F>(
    intrigue_id: Uuid,
    store: &dyn KeyValueStore,
    op: F,
) -> Result<Transition<Intrigue>, EngineError>
where
    F: FnOnce(Intrigue) -> Transition<Intrigue>,
{
    let session: Intrigue = require_record(store, intrigue_id).await?;
    let transition = op(session);
    match transition.rejection() {
        None => save_record(store, &transition.state).await?,
        Some(reason) => debug!(%reason, "transition rejected, nothing persisted"),
    }
    Ok(transition)
}

async fn persist<F>(
    intrigue_id: Uuid,
    store: &dyn KeyValueStore,
    op: F,
) -> Result<Intrigue, EngineError>
where
    F: FnOnce(Intrigue) -> Intrigue,
{
    let session: Intrigue = require_record(store, intrigue_id).await?;
    let session = op(session);
    save_record(store, &session).await?;
    Ok(session)
}

/// Opens a new intrigue session in setup and persists it.
///
/// # Errors
///
/// Returns `EngineError` on serialization or storage failure.
#[instrument(skip(command, clock, store), fields(intrigue_id = %command.intrigue_id, correlation_id = %command.correlation_id))]
pub async fn handle_create_intrigue(
    command: &CreateIntrigue,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Intrigue, EngineError> {
    let session = Intrigue::new(command.intrigue_id, command.name.clone(), clock);
    save_record(store, &session).await?;
    info!(name = %session.name, "intrigue session opened");
    Ok(session)
}

/// Adds a domain to a stored session.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the session is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(intrigue_id = %command.intrigue_id, correlation_id = %command.correlation_id))]
pub async fn handle_add_domain(
    command: &AddDomain,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Intrigue, EngineError> {
    persist(command.intrigue_id, store, |session| {
        session.add_domain(command.domain_id, clock)
    })
    .await
}

/// Removes a domain from a stored session.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the session is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(intrigue_id = %command.intrigue_id, correlation_id = %command.correlation_id))]
pub async fn handle_remove_domain(
    command: &RemoveDomain,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Intrigue, EngineError> {
    persist(command.intrigue_id, store, |session| {
        session.remove_domain(command.domain_id, clock)
    })
    .await
}

/// Sets the initiator on a stored session.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the session is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(intrigue_id = %command.intrigue_id, correlation_id = %command.correlation_id))]
pub async fn handle_set_initiator(
    command: &SetInitiator,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Intrigue, EngineError> {
    persist(command.intrigue_id, store, |session| {
        session.set_initiator(command.domain_id, clock)
    })
    .await
}

/// Starts a stored session.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the session is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(intrigue_id = %command.intrigue_id, correlation_id = %command.correlation_id))]
pub async fn handle_start_intrigue(
    command: &StartIntrigue,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Transition<Intrigue>, EngineError> {
    apply(command.intrigue_id, store, |session| session.start(clock)).await
}

/// Ends a stored session.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the session is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(intrigue_id = %command.intrigue_id, correlation_id = %command.correlation_id))]
pub async fn handle_end_intrigue(
    command: &EndIntrigue,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Transition<Intrigue>, EngineError> {
    apply(command.intrigue_id, store, |session| session.end(clock)).await
}

/// Takes a turn with an already-resolved action.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the session is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(intrigue_id = %command.intrigue_id, correlation_id = %command.correlation_id))]
pub async fn handle_take_turn(
    command: &TakeTurn,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Transition<Intrigue>, EngineError> {
    apply(command.intrigue_id, store, |session| {
        session.take_turn(command.domain_id, command.action.clone(), clock)
    })
    .await
}

/// Resolves a domain skill test and takes the turn with the resolved action.
///
/// The acting domain is loaded for its skill modifier and size; the check is
/// `1d20 + modifier + proficiency` against the difficulty.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the session or the acting domain
/// is not stored, or a serialization/storage error.
#[instrument(skip(command, clock, rng, store), fields(intrigue_id = %command.intrigue_id, domain_id = %command.domain_id, correlation_id = %command.correlation_id))]
pub async fn handle_resolve_skill_test(
    command: &ResolveSkillTest,
    clock: &dyn Clock,
    rng: &Mutex<dyn DeterministicRng + Send>,
    store: &dyn KeyValueStore,
) -> Result<Transition<Intrigue>, EngineError> {
    let domain: Domain = require_record(store, command.domain_id).await?;

    // Lock the RNG only for the synchronous check — never across an await.
    let check = {
        let mut rng_guard = rng
            .lock()
            .map_err(|e| EngineError::Storage(format!("RNG mutex poisoned: {e}")))?;
        domain_skill_check(
            &mut *rng_guard,
            domain.skill_modifier(command.skill),
            domain.size.rank(),
            command.difficulty,
            command.advantage,
        )
    };

    let action = IntrigueAction::skill_test(command.skill, command.difficulty)
        .resolved(SkillTestResult::from(check));

    apply(command.intrigue_id, store, |session| {
        session.take_turn(command.domain_id, action, clock)
    })
    .await
}

/// Appends a free-form narrative entry to a stored session's log.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if the session is not stored, or a
/// serialization/storage error.
#[instrument(skip(command, clock, store), fields(intrigue_id = %command.intrigue_id, correlation_id = %command.correlation_id))]
pub async fn handle_log_note(
    command: &LogNote,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Intrigue, EngineError> {
    persist(command.intrigue_id, store, |session| {
        session.note(command.message.clone(), clock)
    })
    .await
}
