//! The military unit entity.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use warmarch_core::clock::Clock;
use warmarch_core::store::{Entity, EntityKind};

/// Condition marking a unit whose casualty die has reached 0.
pub const BROKEN: &str = "broken";

/// Military unit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    /// Foot troops.
    Infantry,
    /// Mounted troops.
    Cavalry,
    /// Siege and ranged engines.
    Artillery,
    /// Flying troops.
    Aerial,
}

/// Unit tier, I through V. Serialized as 1–5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Tier {
    /// Tier I.
    I,
    /// Tier II.
    II,
    /// Tier III.
    III,
    /// Tier IV.
    IV,
    /// Tier V.
    V,
}

impl Tier {
    /// The tier as a number, 1–5.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::I => 1,
            Self::II => 2,
            Self::III => 3,
            Self::IV => 4,
            Self::V => 5,
        }
    }

    const fn index(self) -> usize {
        self.rank() as usize - 1
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.rank()
    }
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::I),
            2 => Ok(Self::II),
            3 => Ok(Self::III),
            4 => Ok(Self::IV),
            5 => Ok(Self::V),
            other => Err(format!("tier must be 1-5, got {other}")),
        }
    }
}

/// Caller-suppliable base stats. The default block is the standard fresh
/// levy: attack 0, power 0, defense 10, toughness 10, morale 10, command 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    /// Attack bonus.
    pub attack: i32,
    /// Damage bonus.
    pub power: i32,
    /// Defense score attackers test against.
    pub defense: i32,
    /// Toughness score damage tests against.
    pub toughness: i32,
    /// Morale score.
    pub morale: i32,
    /// Command bonus (drives initiative by convention).
    pub command: i32,
}

impl Default for BaseStats {
    fn default() -> Self {
        Self {
            attack: 0,
            power: 0,
            defense: 10,
            toughness: 10,
            morale: 10,
            command: 0,
        }
    }
}

/// Full stat block: caller-supplied bases plus type/tier-derived values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStats {
    /// Attack bonus.
    pub attack: i32,
    /// Damage bonus.
    pub power: i32,
    /// Defense score.
    pub defense: i32,
    /// Toughness score.
    pub toughness: i32,
    /// Morale score.
    pub morale: i32,
    /// Command bonus.
    pub command: i32,
    /// Attacks per activation (derived, ≥ 1).
    pub attacks: u32,
    /// Damage dice per hit (derived, ≥ 1).
    pub damage: u32,
}

/// A unit's remaining-strength counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CasualtyDie {
    /// Remaining strength, `0 ≤ current ≤ max`.
    pub current: u32,
    /// Full strength (derived, ≥ 1).
    pub max: u32,
}

// Tier-scaled bases for tiers I-V.
const ATTACKS_BY_TIER: [i32; 5] = [1, 1, 2, 2, 3];
const DAMAGE_BY_TIER: [i32; 5] = [1, 1, 2, 2, 3];
const CASUALTY_DIE_BY_TIER: [i32; 5] = [1, 2, 3, 4, 5];

#[allow(clippy::cast_sign_loss)]
fn derive_stats(kind: UnitType, tier: Tier) -> (u32, u32, u32) {
    let (attack_mod, damage_mod, casualty_mod) = match kind {
        UnitType::Infantry => (0, 0, 0),
        UnitType::Cavalry => (0, 1, 0),
        UnitType::Artillery => (-1, 1, -1),
        UnitType::Aerial => (0, 0, -1),
    };
    let i = tier.index();
    let attacks = (ATTACKS_BY_TIER[i] + attack_mod).max(1) as u32;
    let damage = (DAMAGE_BY_TIER[i] + damage_mod).max(1) as u32;
    let casualty_max = (CASUALTY_DIE_BY_TIER[i] + casualty_mod).max(1) as u32;
    (attacks, damage, casualty_max)
}

/// A military formation participating in warfare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Entity identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Unit type.
    #[serde(rename = "type")]
    pub kind: UnitType,
    /// Unit tier.
    pub tier: Tier,
    /// Stat block.
    pub stats: UnitStats,
    /// Remaining-strength counter.
    pub casualty_die: CasualtyDie,
    /// Permanent traits.
    pub traits: BTreeSet<String>,
    /// Transient conditions, including the `broken` sentinel.
    pub conditions: BTreeSet<String>,
    /// Experience counter.
    pub experience: u32,
    /// Battles fought counter.
    pub battles: u32,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
    /// Last-mutation timestamp.
    pub updated: DateTime<Utc>,
}

impl Unit {
    /// Creates a unit, deriving attacks, damage dice, and casualty die from
    /// the type and tier.
    #[must_use]
    pub fn new(
        id: Uuid,
        name: impl Into<String>,
        kind: UnitType,
        tier: Tier,
        base: BaseStats,
        clock: &dyn Clock,
    ) -> Self {
        let (attacks, damage, casualty_max) = derive_stats(kind, tier);
        let now = clock.now();
        Self {
            id,
            name: name.into(),
            kind,
            tier,
            stats: UnitStats {
                attack: base.attack,
                power: base.power,
                defense: base.defense,
                toughness: base.toughness,
                morale: base.morale,
                command: base.command,
                attacks,
                damage,
            },
            casualty_die: CasualtyDie {
                current: casualty_max,
                max: casualty_max,
            },
            traits: BTreeSet::new(),
            conditions: BTreeSet::new(),
            experience: 0,
            battles: 0,
            created: now,
            updated: now,
        }
    }

    fn touched(mut self, clock: &dyn Clock) -> Self {
        self.updated = clock.now();
        self
    }

    /// Whether the unit carries the `broken` condition.
    #[must_use]
    pub fn is_broken(&self) -> bool {
        self.conditions.contains(BROKEN)
    }

    /// Reduces the casualty die by `amount`, clamping at 0. A unit at 0 is
    /// marked `broken` (idempotently).
    #[must_use]
    pub fn take_casualties(mut self, amount: u32, clock: &dyn Clock) -> Self {
        self.casualty_die.current = self.casualty_die.current.saturating_sub(amount);
        if self.casualty_die.current == 0 {
            self.conditions.insert(BROKEN.to_owned());
        }
        self.touched(clock)
    }

    /// Restores the casualty die by `amount`, clamping at max. A unit back
    /// above 0 sheds the `broken` condition.
    #[must_use]
    pub fn rally_casualties(mut self, amount: u32, clock: &dyn Clock) -> Self {
        self.casualty_die.current = self
            .casualty_die
            .current
            .saturating_add(amount)
            .min(self.casualty_die.max);
        if self.casualty_die.current > 0 {
            self.conditions.remove(BROKEN);
        }
        self.touched(clock)
    }

    /// Adds a trait. Already-present traits are left as-is.
    #[must_use]
    pub fn add_trait(mut self, name: impl Into<String>, clock: &dyn Clock) -> Self {
        self.traits.insert(name.into());
        self.touched(clock)
    }

    /// Removes a trait. Absent traits are a no-op.
    #[must_use]
    pub fn remove_trait(mut self, name: &str, clock: &dyn Clock) -> Self {
        self.traits.remove(name);
        self.touched(clock)
    }

    /// Adds a condition. Already-present conditions are left as-is.
    #[must_use]
    pub fn add_condition(mut self, name: impl Into<String>, clock: &dyn Clock) -> Self {
        self.conditions.insert(name.into());
        self.touched(clock)
    }

    /// Removes a condition. Absent conditions are a no-op.
    #[must_use]
    pub fn remove_condition(mut self, name: &str, clock: &dyn Clock) -> Self {
        self.conditions.remove(name);
        self.touched(clock)
    }

    /// Adds to the experience counter.
    #[must_use]
    pub fn award_experience(mut self, amount: u32, clock: &dyn Clock) -> Self {
        self.experience = self.experience.saturating_add(amount);
        self.touched(clock)
    }

    /// Increments the battles-fought counter.
    #[must_use]
    pub fn record_battle(mut self, clock: &dyn Clock) -> Self {
        self.battles = self.battles.saturating_add(1);
        self.touched(clock)
    }
}

impl Entity for Unit {
    const KIND: EntityKind = EntityKind::Unit;

    fn entity_id(&self) -> Uuid {
        self.id
    }
}
