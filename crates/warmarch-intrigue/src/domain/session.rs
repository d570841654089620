//! The intrigue session entity and its state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use warmarch_core::clock::Clock;
use warmarch_core::store::{Entity, EntityKind};
use warmarch_core::transition::{Rejection, Transition};

use super::actions::IntrigueAction;
use super::events::{IntrigueLogEntry, IntrigueLogKind};

/// Intrigue phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntriguePhase {
    /// Assembling domains and an initiator.
    Setup,
    /// Turns are being taken.
    Active,
    /// The session is over.
    Resolution,
}

impl IntriguePhase {
    /// The phase as its wire name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Active => "active",
            Self::Resolution => "resolution",
        }
    }
}

/// One taken turn: who acted, what they did, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// The acting domain.
    pub domain_id: Uuid,
    /// The action taken (already resolved where resolution applies).
    pub action: IntrigueAction,
    /// When the turn was taken.
    pub at: DateTime<Utc>,
}

/// A turn-based political contest among domains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intrigue {
    /// Entity identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Current phase.
    pub phase: IntriguePhase,
    /// Participating domain ids, unique and insertion-ordered.
    pub domains: Vec<Uuid>,
    /// The domain that opens the session; always a member once set.
    pub initiator: Option<Uuid>,
    /// Turn order, initiator first; fixed once the session goes active.
    pub turn_order: Vec<Uuid>,
    /// Index into `turn_order` of the domain whose turn it is.
    pub current_domain_index: usize,
    /// Append-only record of taken turns.
    pub turns: Vec<TurnRecord>,
    /// Append-only event log.
    pub log: Vec<IntrigueLogEntry>,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
    /// Last-mutation timestamp.
    pub updated: DateTime<Utc>,
}

impl Intrigue {
    /// Creates a session in setup: no domains, no initiator, no turns.
    #[must_use]
    pub fn new(id: Uuid, name: impl Into<String>, clock: &dyn Clock) -> Self {
        let now = clock.now();
        Self {
            id,
            name: name.into(),
            phase: IntriguePhase::Setup,
            domains: Vec::new(),
            initiator: None,
            turn_order: Vec::new(),
            current_domain_index: 0,
            turns: Vec::new(),
            log: Vec::new(),
            created: now,
            updated: now,
        }
    }

    fn touched(mut self, clock: &dyn Clock) -> Self {
        self.updated = clock.now();
        self
    }

    fn record(&mut self, kind: IntrigueLogKind, clock: &dyn Clock) {
        self.log.push(IntrigueLogEntry {
            at: clock.now(),
            kind,
        });
    }

    /// The domain whose turn it is, once the turn order exists.
    #[must_use]
    pub fn current_domain(&self) -> Option<Uuid> {
        self.turn_order.get(self.current_domain_index).copied()
    }

    /// Adds a domain. Re-adding a present domain keeps its position.
    #[must_use]
    pub fn add_domain(mut self, domain_id: Uuid, clock: &dyn Clock) -> Self {
        if !self.domains.contains(&domain_id) {
            self.domains.push(domain_id);
        }
        self.touched(clock)
    }

    /// Removes a domain: its membership, its turn-order slot, and — if it
    /// was the initiator — the initiator itself. Removing an absent domain
    /// changes nothing.
    #[must_use]
    pub fn remove_domain(mut self, domain_id: Uuid, clock: &dyn Clock) -> Self {
        self.domains.retain(|id| *id != domain_id);
        self.turn_order.retain(|id| *id != domain_id);
        if self.initiator == Some(domain_id) {
            self.initiator = None;
        }
        // The filtered order can leave the turn index past the end; wrap it.
        if self.current_domain_index >= self.turn_order.len() {
            self.current_domain_index = 0;
        }
        self.touched(clock)
    }

    /// Sets the initiator, first adding the domain if it is not yet a
    /// member.
    #[must_use]
    pub fn set_initiator(mut self, domain_id: Uuid, clock: &dyn Clock) -> Self {
        if !self.domains.contains(&domain_id) {
            self.domains.push(domain_id);
        }
        self.initiator = Some(domain_id);
        self.touched(clock)
    }

    /// Starts the session. Requires setup phase, a set initiator, and at
    /// least two domains. An empty turn order is computed as the initiator
    /// followed by the other domains in the order they were added.
    pub fn start(mut self, clock: &dyn Clock) -> Transition<Self> {
        if self.phase != IntriguePhase::Setup {
            return Transition::rejected(self, Rejection::InvalidPhase);
        }
        let Some(initiator) = self.initiator else {
            return Transition::rejected(self, Rejection::MissingInitiator);
        };
        if self.domains.len() < 2 {
            return Transition::rejected(self, Rejection::NotEnoughDomains);
        }
        self.phase = IntriguePhase::Active;
        if self.turn_order.is_empty() {
            self.turn_order.push(initiator);
            self.turn_order
                .extend(self.domains.iter().copied().filter(|id| *id != initiator));
        }
        self.record(IntrigueLogKind::IntrigueStart, clock);
        Transition::applied(self.touched(clock))
    }

    /// Ends the session: active phase only.
    pub fn end(mut self, clock: &dyn Clock) -> Transition<Self> {
        if self.phase != IntriguePhase::Active {
            return Transition::rejected(self, Rejection::InvalidPhase);
        }
        self.phase = IntriguePhase::Resolution;
        self.record(IntrigueLogKind::IntrigueEnd, clock);
        Transition::applied(self.touched(clock))
    }

    /// Takes a turn for `domain_id`. Rejected outside the active phase, for
    /// non-members, and when it is not that domain's turn. On success the
    /// turn is recorded, `turn_taken` logged, and the turn index advances
    /// modulo the order length.
    pub fn take_turn(
        mut self,
        domain_id: Uuid,
        action: IntrigueAction,
        clock: &dyn Clock,
    ) -> Transition<Self> {
        if self.phase != IntriguePhase::Active {
            return Transition::rejected(self, Rejection::InvalidPhase);
        }
        if !self.domains.contains(&domain_id) {
            return Transition::rejected(self, Rejection::UnknownDomain);
        }
        if self.current_domain() != Some(domain_id) {
            return Transition::rejected(self, Rejection::OutOfTurn);
        }
        self.turns.push(TurnRecord {
            domain_id,
            action,
            at: clock.now(),
        });
        self.record(IntrigueLogKind::TurnTaken { domain_id }, clock);
        self.current_domain_index = (self.current_domain_index + 1) % self.turn_order.len();
        Transition::applied(self.touched(clock))
    }

    /// Appends a free-form narrative entry to the log.
    #[must_use]
    pub fn note(mut self, message: impl Into<String>, clock: &dyn Clock) -> Self {
        self.record(
            IntrigueLogKind::Note {
                message: message.into(),
            },
            clock,
        );
        self.touched(clock)
    }
}

impl Entity for Intrigue {
    const KIND: EntityKind = EntityKind::Intrigue;

    fn entity_id(&self) -> Uuid {
        self.id
    }
}
