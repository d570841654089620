//! Query handlers for the Intrigue Session engine.

use serde::Serialize;
use uuid::Uuid;
use warmarch_core::error::EngineError;
use warmarch_core::store::{KeyValueStore, require_record};

use crate::domain::events::IntrigueLogEntry;
use crate::domain::session::{Intrigue, TurnRecord};

/// Read-only view of an intrigue session.
#[derive(Debug, Serialize)]
pub struct IntrigueView {
    /// The session identifier.
    pub intrigue_id: Uuid,
    /// Display name.
    pub name: String,
    /// Current phase as a string.
    pub phase: String,
    /// Participating domains.
    pub domains: Vec<Uuid>,
    /// The initiating domain, if set.
    pub initiator: Option<Uuid>,
    /// The fixed turn order.
    pub turn_order: Vec<Uuid>,
    /// The domain whose turn it is.
    pub current_domain: Option<Uuid>,
    /// Every taken turn.
    pub turns: Vec<TurnRecord>,
    /// The full event log.
    pub log: Vec<IntrigueLogEntry>,
}

/// Retrieves an intrigue view by id.
///
/// # Errors
///
/// Returns `EngineError::EntityNotFound` if no session is stored under the
/// id, or a serialization/storage error.
pub async fn get_intrigue_by_id(
    intrigue_id: Uuid,
    store: &dyn KeyValueStore,
) -> Result<IntrigueView, EngineError> {
    let session: Intrigue = require_record(store, intrigue_id).await?;

    Ok(IntrigueView {
        intrigue_id: session.id,
        name: session.name.clone(),
        phase: session.phase.name().to_owned(),
        domains: session.domains.clone(),
        initiator: session.initiator,
        turn_order: session.turn_order.clone(),
        current_domain: session.current_domain(),
        turns: session.turns,
        log: session.log,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use warmarch_core::store::save_record;
    use warmarch_test_support::{FixedClock, RecordingStore};

    use super::*;

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn test_view_reflects_session_state() {
        let store = RecordingStore::new();
        let clock = fixed_clock();
        let d1 = Uuid::new_v4();
        let d2 = Uuid::new_v4();

        let session = Intrigue::new(Uuid::new_v4(), "The Quiet War", &clock)
            .add_domain(d2, &clock)
            .set_initiator(d1, &clock)
            .start(&clock)
            .into_state();
        save_record(&store, &session).await.unwrap();

        let view = get_intrigue_by_id(session.id, &store).await.unwrap();
        assert_eq!(view.phase, "active");
        assert_eq!(view.initiator, Some(d1));
        assert_eq!(view.turn_order, vec![d1, d2]);
        assert_eq!(view.current_domain, Some(d1));
        assert!(view.turns.is_empty());
    }

    #[tokio::test]
    async fn test_missing_session_reports_not_found() {
        let store = RecordingStore::new();
        let err = get_intrigue_by_id(Uuid::new_v4(), &store).await.unwrap_err();
        assert!(matches!(err, EngineError::EntityNotFound { .. }));
    }
}
