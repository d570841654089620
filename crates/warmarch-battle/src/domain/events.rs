//! Battle log events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event payload variants recorded in a battle log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BattleLogKind {
    /// The battle started.
    BattleStart,
    /// The battle ended, with the winning domain if one was determined.
    BattleEnd {
        /// The winning domain, if any.
        winner: Option<Uuid>,
    },
    /// A unit activated on its turn.
    UnitActivated {
        /// The activated unit.
        unit_id: Uuid,
    },
    /// A new round began.
    RoundStart {
        /// The round number.
        round: u32,
    },
    /// A round finished.
    RoundEnd {
        /// The round number.
        round: u32,
    },
    /// A free-form narrative entry.
    Note {
        /// The entry text.
        message: String,
    },
}

/// A timestamped, append-only battle log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleLogEntry {
    /// When the event happened.
    pub at: DateTime<Utc>,
    /// What happened.
    #[serde(flatten)]
    pub kind: BattleLogKind,
}
