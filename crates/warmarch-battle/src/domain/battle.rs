//! The battle entity and its state machine.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use warmarch_core::clock::Clock;
use warmarch_core::store::{Entity, EntityKind};
use warmarch_core::transition::{Rejection, Transition};

use super::events::{BattleLogEntry, BattleLogKind};
use super::grid::{Grid, Position};

/// Battle phase. `Deployment` is declared for forward compatibility but no
/// transition currently enters it: `start` goes directly from `Setup` to
/// `Battle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattlePhase {
    /// Assembling domains and units.
    Setup,
    /// Reserved; not entered by any current transition.
    Deployment,
    /// Rounds are being fought.
    Battle,
    /// The battle is over.
    Aftermath,
}

impl BattlePhase {
    /// The phase as its wire name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Deployment => "deployment",
            Self::Battle => "battle",
            Self::Aftermath => "aftermath",
        }
    }
}

/// Per-battle state for one participating unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleUnit {
    /// The domain this unit fights for.
    pub domain_id: Uuid,
    /// Where the unit stands.
    pub position: Position,
    /// Whether the unit has activated this turn.
    pub activated: bool,
    /// Whether the unit has spent its reaction this round.
    pub used_reaction: bool,
    /// Free-form tokens. Duplicates are allowed.
    pub tokens: Vec<String>,
}

impl BattleUnit {
    fn new(domain_id: Uuid) -> Self {
        Self {
            domain_id,
            position: Position::NotDeployed,
            activated: false,
            used_reaction: false,
            tokens: Vec::new(),
        }
    }
}

/// A warfare battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battle {
    /// Entity identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Current phase.
    pub phase: BattlePhase,
    /// Current round; 0 before the battle starts.
    pub round: u32,
    /// Participating domain ids, unique and insertion-ordered.
    pub domains: Vec<Uuid>,
    /// Per-unit battle state.
    pub units: BTreeMap<Uuid, BattleUnit>,
    /// The deployment grid.
    pub grid: Grid,
    /// Activation order; set wholesale by command.
    pub initiative: Vec<Uuid>,
    /// Index into `initiative` of the unit whose turn it is.
    pub current_turn: usize,
    /// Append-only event log.
    pub log: Vec<BattleLogEntry>,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
    /// Last-mutation timestamp.
    pub updated: DateTime<Utc>,
}

impl Battle {
    /// Creates a battle in setup: empty grid, no initiative, no log.
    #[must_use]
    pub fn new(id: Uuid, name: impl Into<String>, clock: &dyn Clock) -> Self {
        let now = clock.now();
        Self {
            id,
            name: name.into(),
            phase: BattlePhase::Setup,
            round: 0,
            domains: Vec::new(),
            units: BTreeMap::new(),
            grid: Grid::default(),
            initiative: Vec::new(),
            current_turn: 0,
            log: Vec::new(),
            created: now,
            updated: now,
        }
    }

    fn touched(mut self, clock: &dyn Clock) -> Self {
        self.updated = clock.now();
        self
    }

    fn record(&mut self, kind: BattleLogKind, clock: &dyn Clock) {
        self.log.push(BattleLogEntry {
            at: clock.now(),
            kind,
        });
    }

    /// The unit whose turn it is, if initiative has been set.
    #[must_use]
    pub fn current_unit(&self) -> Option<Uuid> {
        self.initiative.get(self.current_turn).copied()
    }

    /// Adds a domain to the battle. Re-adding a present domain keeps its
    /// position.
    #[must_use]
    pub fn add_domain(mut self, domain_id: Uuid, clock: &dyn Clock) -> Self {
        if !self.domains.contains(&domain_id) {
            self.domains.push(domain_id);
        }
        self.touched(clock)
    }

    /// Removes a domain and every unit fighting for it (grid slots and
    /// initiative entries included). Removing an absent domain changes
    /// nothing.
    #[must_use]
    pub fn remove_domain(mut self, domain_id: Uuid, clock: &dyn Clock) -> Self {
        self.domains.retain(|id| *id != domain_id);
        let doomed: Vec<Uuid> = self
            .units
            .iter()
            .filter(|(_, unit)| unit.domain_id == domain_id)
            .map(|(id, _)| *id)
            .collect();
        for unit_id in doomed {
            self.evict_unit(unit_id);
        }
        self.touched(clock)
    }

    /// Adds a unit fighting for `domain_id`, landing in the not-deployed
    /// list. A domain not yet in the battle is added in the same
    /// transition. (The source implementation instead dropped the unit and
    /// only added the domain; that asymmetry is fixed forward here.)
    pub fn add_unit(mut self, unit_id: Uuid, domain_id: Uuid, clock: &dyn Clock) -> Transition<Self> {
        if self.units.contains_key(&unit_id) {
            return Transition::rejected(self, Rejection::AlreadyPresent);
        }
        if !self.domains.contains(&domain_id) {
            self.domains.push(domain_id);
        }
        self.units.insert(unit_id, BattleUnit::new(domain_id));
        self.grid.occupy(unit_id, Position::NotDeployed);
        Transition::applied(self.touched(clock))
    }

    /// Removes a unit: its grid slot is vacated, its initiative entry
    /// dropped, and its battle state discarded.
    pub fn remove_unit(mut self, unit_id: Uuid, clock: &dyn Clock) -> Transition<Self> {
        if !self.units.contains_key(&unit_id) {
            return Transition::rejected(self, Rejection::UnknownUnit);
        }
        self.evict_unit(unit_id);
        Transition::applied(self.touched(clock))
    }

    fn evict_unit(&mut self, unit_id: Uuid) {
        if let Some(unit) = self.units.remove(&unit_id) {
            self.grid.vacate(unit_id, unit.position);
        }
        self.initiative.retain(|id| *id != unit_id);
        // The filtered order can leave the turn index past the end; wrap it
        // without touching the round counter.
        if self.current_turn >= self.initiative.len() {
            self.current_turn = 0;
        }
    }

    /// Moves a unit to `position`. Rejected if the unit is unknown or the
    /// target cell is occupied (the occupancy check does not special-case
    /// the unit itself). On success the old slot is vacated and the new one
    /// occupied in the same transition.
    pub fn deploy_unit(
        mut self,
        unit_id: Uuid,
        position: Position,
        clock: &dyn Clock,
    ) -> Transition<Self> {
        let Some(unit) = self.units.get(&unit_id) else {
            return Transition::rejected(self, Rejection::UnknownUnit);
        };
        let previous = unit.position;
        if !self.grid.is_free(position) {
            return Transition::rejected(self, Rejection::CellOccupied);
        }
        self.grid.vacate(unit_id, previous);
        self.grid.occupy(unit_id, position);
        if let Some(unit) = self.units.get_mut(&unit_id) {
            unit.position = position;
        }
        Transition::applied(self.touched(clock))
    }

    /// Replaces the initiative order wholesale. The caller computes the
    /// order — by convention command bonus descending; see
    /// [`order_by_command`].
    #[must_use]
    pub fn set_initiative(mut self, order: Vec<Uuid>, clock: &dyn Clock) -> Self {
        self.initiative = order;
        self.touched(clock)
    }

    /// Starts the battle: setup only. Round becomes 1 and `battle_start` is
    /// logged.
    pub fn start(mut self, clock: &dyn Clock) -> Transition<Self> {
        if self.phase != BattlePhase::Setup {
            return Transition::rejected(self, Rejection::InvalidPhase);
        }
        self.phase = BattlePhase::Battle;
        self.round = 1;
        self.record(BattleLogKind::BattleStart, clock);
        Transition::applied(self.touched(clock))
    }

    /// Ends the battle: battle phase only. `battle_end` is logged with the
    /// winner, which may be undetermined.
    pub fn end(mut self, winner: Option<Uuid>, clock: &dyn Clock) -> Transition<Self> {
        if self.phase != BattlePhase::Battle {
            return Transition::rejected(self, Rejection::InvalidPhase);
        }
        self.phase = BattlePhase::Aftermath;
        self.record(BattleLogKind::BattleEnd { winner }, clock);
        Transition::applied(self.touched(clock))
    }

    /// Activates a unit on its turn. Rejected outside the battle phase, for
    /// unknown units, and when it is not that unit's turn.
    pub fn activate_unit(mut self, unit_id: Uuid, clock: &dyn Clock) -> Transition<Self> {
        if self.phase != BattlePhase::Battle {
            return Transition::rejected(self, Rejection::InvalidPhase);
        }
        if !self.units.contains_key(&unit_id) {
            return Transition::rejected(self, Rejection::UnknownUnit);
        }
        if self.current_unit() != Some(unit_id) {
            return Transition::rejected(self, Rejection::OutOfTurn);
        }
        if let Some(unit) = self.units.get_mut(&unit_id) {
            unit.activated = true;
        }
        self.record(BattleLogKind::UnitActivated { unit_id }, clock);
        Transition::applied(self.touched(clock))
    }

    /// Marks a unit's reaction as spent for this round. `end_turn` resets
    /// the flag when the round wraps.
    pub fn use_reaction(mut self, unit_id: Uuid, clock: &dyn Clock) -> Transition<Self> {
        if self.phase != BattlePhase::Battle {
            return Transition::rejected(self, Rejection::InvalidPhase);
        }
        let Some(unit) = self.units.get_mut(&unit_id) else {
            return Transition::rejected(self, Rejection::UnknownUnit);
        };
        unit.used_reaction = true;
        Transition::applied(self.touched(clock))
    }

    /// Ends the current turn: the departing unit's `activated` flag resets
    /// and the turn index advances. When it wraps to 0 a full round is
    /// complete — the round counter increments, every unit's reaction
    /// returns, and `round_end` then `round_start` are logged.
    pub fn end_turn(mut self, clock: &dyn Clock) -> Transition<Self> {
        if self.phase != BattlePhase::Battle {
            return Transition::rejected(self, Rejection::InvalidPhase);
        }
        if self.initiative.is_empty() {
            return Transition::rejected(self, Rejection::EmptyInitiative);
        }
        if let Some(departing) = self.current_unit()
            && let Some(unit) = self.units.get_mut(&departing)
        {
            unit.activated = false;
        }
        self.current_turn = (self.current_turn + 1) % self.initiative.len();
        if self.current_turn == 0 {
            let finished = self.round;
            self.round += 1;
            for unit in self.units.values_mut() {
                unit.used_reaction = false;
            }
            self.record(BattleLogKind::RoundEnd { round: finished }, clock);
            self.record(BattleLogKind::RoundStart { round: self.round }, clock);
        }
        Transition::applied(self.touched(clock))
    }

    /// Adds a token to a unit. Duplicates are allowed.
    pub fn add_token(
        mut self,
        unit_id: Uuid,
        token: impl Into<String>,
        clock: &dyn Clock,
    ) -> Transition<Self> {
        let Some(unit) = self.units.get_mut(&unit_id) else {
            return Transition::rejected(self, Rejection::UnknownUnit);
        };
        unit.tokens.push(token.into());
        Transition::applied(self.touched(clock))
    }

    /// Removes every token matching `token` exactly.
    pub fn remove_token(mut self, unit_id: Uuid, token: &str, clock: &dyn Clock) -> Transition<Self> {
        let Some(unit) = self.units.get_mut(&unit_id) else {
            return Transition::rejected(self, Rejection::UnknownUnit);
        };
        unit.tokens.retain(|t| t != token);
        Transition::applied(self.touched(clock))
    }

    /// Appends a free-form narrative entry to the log.
    #[must_use]
    pub fn note(mut self, message: impl Into<String>, clock: &dyn Clock) -> Self {
        self.record(
            BattleLogKind::Note {
                message: message.into(),
            },
            clock,
        );
        self.touched(clock)
    }
}

impl Entity for Battle {
    const KIND: EntityKind = EntityKind::Battle;

    fn entity_id(&self) -> Uuid {
        self.id
    }
}

/// The conventional initiative order: command bonus descending, ties keeping
/// encounter order (the sort is stable).
#[must_use]
pub fn order_by_command(units: &[(Uuid, i32)]) -> Vec<Uuid> {
    let mut ordered = units.to_vec();
    ordered.sort_by(|a, b| b.1.cmp(&a.1));
    ordered.into_iter().map(|(id, _)| id).collect()
}
