//! Engine error types.
//!
//! Ordinary rejected state transitions are *not* errors — they are reported
//! through [`crate::transition::Transition`]. `EngineError` covers the cases
//! that genuinely fail: missing entities, malformed input caught during
//! validation, serialization, and storage faults.

use thiserror::Error;
use uuid::Uuid;

use crate::store::EntityKind;

/// Top-level engine error type.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An entity was not found in storage.
    #[error("{kind} not found: {id}")]
    EntityNotFound {
        /// The kind of entity that was looked up.
        kind: EntityKind,
        /// The identifier that missed.
        id: Uuid,
    },

    /// A validation error in engine logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An entity or index record failed to (de)serialize.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A storage/infrastructure error.
    #[error("storage error: {0}")]
    Storage(String),
}
