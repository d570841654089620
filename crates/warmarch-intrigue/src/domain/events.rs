//! Intrigue log events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event payload variants recorded in an intrigue log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IntrigueLogKind {
    /// The session went active.
    IntrigueStart,
    /// The session moved to resolution.
    IntrigueEnd,
    /// A domain took its turn.
    TurnTaken {
        /// The acting domain.
        domain_id: Uuid,
    },
    /// A free-form narrative entry.
    Note {
        /// The entry text.
        message: String,
    },
}

/// A timestamped, append-only intrigue log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntrigueLogEntry {
    /// When the event happened.
    pub at: DateTime<Utc>,
    /// What happened.
    #[serde(flatten)]
    pub kind: IntrigueLogKind,
}
