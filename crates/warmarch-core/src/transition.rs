//! Transition outcome model.
//!
//! Battle and intrigue operations never throw for an invalid request: they
//! return the state (unchanged on rejection) together with an explicit
//! outcome, so callers and tests can tell "nothing happened" apart from
//! "applied" without diffing entities.

use serde::{Deserialize, Serialize};

/// Why a state transition was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// The entity is not in a phase that permits the operation.
    InvalidPhase,
    /// The referenced unit is not part of the entity.
    UnknownUnit,
    /// The referenced domain is not part of the entity.
    UnknownDomain,
    /// The unit is already present.
    AlreadyPresent,
    /// The target grid cell is already occupied.
    CellOccupied,
    /// It is not the referenced unit's or domain's turn.
    OutOfTurn,
    /// The initiative order is empty.
    EmptyInitiative,
    /// No initiator has been set.
    MissingInitiator,
    /// Fewer than two domains are participating.
    NotEnoughDomains,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::InvalidPhase => "invalid_phase",
            Self::UnknownUnit => "unknown_unit",
            Self::UnknownDomain => "unknown_domain",
            Self::AlreadyPresent => "already_present",
            Self::CellOccupied => "cell_occupied",
            Self::OutOfTurn => "out_of_turn",
            Self::EmptyInitiative => "empty_initiative",
            Self::MissingInitiator => "missing_initiator",
            Self::NotEnoughDomains => "not_enough_domains",
        };
        f.write_str(name)
    }
}

/// Whether a transition was applied or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionOutcome {
    /// The operation was applied and the returned state reflects it.
    Applied,
    /// The operation was rejected; the returned state is unchanged.
    Rejected(Rejection),
}

/// The result of attempting a state transition on an entity value.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "a transition carries the new state; dropping it loses the update"]
pub struct Transition<T> {
    /// The entity after the attempt (unchanged when rejected).
    pub state: T,
    /// What happened.
    pub outcome: TransitionOutcome,
}

impl<T> Transition<T> {
    /// Wraps a state that resulted from an applied operation.
    pub fn applied(state: T) -> Self {
        Self {
            state,
            outcome: TransitionOutcome::Applied,
        }
    }

    /// Wraps an unchanged state with the reason the operation was rejected.
    pub fn rejected(state: T, reason: Rejection) -> Self {
        Self {
            state,
            outcome: TransitionOutcome::Rejected(reason),
        }
    }

    /// Returns `true` if the operation was applied.
    pub const fn was_applied(&self) -> bool {
        matches!(self.outcome, TransitionOutcome::Applied)
    }

    /// Returns the rejection reason, if any.
    pub const fn rejection(&self) -> Option<Rejection> {
        match self.outcome {
            TransitionOutcome::Applied => None,
            TransitionOutcome::Rejected(reason) => Some(reason),
        }
    }

    /// Unwraps the carried state, discarding the outcome.
    pub fn into_state(self) -> T {
        self.state
    }
}
