//! The political domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use warmarch_core::clock::Clock;
use warmarch_core::store::{Entity, EntityKind};

/// The four domain skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainSkill {
    /// Treaties, trade, and persuasion.
    Diplomacy,
    /// Spies and secrets.
    Espionage,
    /// Arcana and scholarship.
    Lore,
    /// Logistics and warcraft.
    Operations,
}

/// The three defenses an intrigue action can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Defense {
    /// Couriers, signals, chains of command.
    Communications,
    /// The will of the court and populace.
    Resolve,
    /// Treasury and supply.
    Resources,
}

/// Domain size, 1–5. Drives the domain die and proficiency bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DomainSize(u8);

impl DomainSize {
    /// Builds a size, clamping into 1–5.
    #[must_use]
    pub const fn clamped(size: u8) -> Self {
        if size < 1 {
            Self(1)
        } else if size > 5 {
            Self(5)
        } else {
            Self(size)
        }
    }

    /// The size as a number, 1–5.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self.0
    }

    /// Sides of the domain die: d4 at size 1 up to d12 at size 5.
    #[must_use]
    pub const fn die_sides(self) -> u32 {
        2 + 2 * self.0 as u32
    }

    /// Proficiency bonus: `2 + size / 2`.
    #[must_use]
    pub const fn proficiency_bonus(self) -> i32 {
        2 + (self.0 / 2) as i32
    }
}

impl From<DomainSize> for u8 {
    fn from(size: DomainSize) -> Self {
        size.0
    }
}

impl TryFrom<u8> for DomainSize {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!("domain size must be 1-5, got {value}"))
        }
    }
}

/// Signed skill modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSet {
    /// Diplomacy modifier.
    pub diplomacy: i32,
    /// Espionage modifier.
    pub espionage: i32,
    /// Lore modifier.
    pub lore: i32,
    /// Operations modifier.
    pub operations: i32,
}

impl SkillSet {
    /// The modifier for one skill.
    #[must_use]
    pub const fn modifier(&self, skill: DomainSkill) -> i32 {
        match skill {
            DomainSkill::Diplomacy => self.diplomacy,
            DomainSkill::Espionage => self.espionage,
            DomainSkill::Lore => self.lore,
            DomainSkill::Operations => self.operations,
        }
    }

    fn merged(self, update: SkillUpdate) -> Self {
        Self {
            diplomacy: update.diplomacy.unwrap_or(self.diplomacy),
            espionage: update.espionage.unwrap_or(self.espionage),
            lore: update.lore.unwrap_or(self.lore),
            operations: update.operations.unwrap_or(self.operations),
        }
    }
}

/// A partial skill change; unset fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillUpdate {
    /// New diplomacy modifier, if changing.
    pub diplomacy: Option<i32>,
    /// New espionage modifier, if changing.
    pub espionage: Option<i32>,
    /// New lore modifier, if changing.
    pub lore: Option<i32>,
    /// New operations modifier, if changing.
    pub operations: Option<i32>,
}

/// Defense scores, derived from skills: `10 + floor(avg of the two related
/// skills)`. Communications pairs diplomacy with espionage, resolve pairs
/// lore with operations, resources pairs diplomacy with operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefenseScores {
    /// Score tested by communications attacks.
    pub communications: i32,
    /// Score tested by resolve attacks.
    pub resolve: i32,
    /// Score tested by resource attacks.
    pub resources: i32,
}

impl DefenseScores {
    /// Recomputes every score from the full skill set.
    #[must_use]
    pub fn from_skills(skills: &SkillSet) -> Self {
        Self {
            communications: 10 + (skills.diplomacy + skills.espionage).div_euclid(2),
            resolve: 10 + (skills.lore + skills.operations).div_euclid(2),
            resources: 10 + (skills.diplomacy + skills.operations).div_euclid(2),
        }
    }

    /// The score for one defense.
    #[must_use]
    pub const fn score(&self, defense: Defense) -> i32 {
        match defense {
            Defense::Communications => self.communications,
            Defense::Resolve => self.resolve,
            Defense::Resources => self.resources,
        }
    }
}

/// Defense levels — independent counters, not derived from skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefenseLevels {
    /// Communications level.
    pub communications: i32,
    /// Resolve level.
    pub resolve: i32,
    /// Resources level.
    pub resources: i32,
}

impl Default for DefenseLevels {
    fn default() -> Self {
        Self {
            communications: 1,
            resolve: 1,
            resources: 1,
        }
    }
}

/// A political entity participating in intrigue and owning units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Entity identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Domain size, 1–5.
    pub size: DomainSize,
    /// Skill modifiers.
    pub skills: SkillSet,
    /// Derived defense scores; always consistent with `skills`.
    pub defense_scores: DefenseScores,
    /// Independent defense-level counters.
    pub defense_levels: DefenseLevels,
    /// Resource pool; never negative.
    pub resources: u32,
    /// Owned unit ids, unique and insertion-ordered.
    pub units: Vec<Uuid>,
    /// Officer ids, unique and insertion-ordered.
    pub officers: Vec<Uuid>,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
    /// Last-mutation timestamp.
    pub updated: DateTime<Utc>,
}

impl Domain {
    /// Creates a domain, computing defense scores from the supplied skills.
    #[must_use]
    pub fn new(
        id: Uuid,
        name: impl Into<String>,
        size: DomainSize,
        skills: SkillSet,
        clock: &dyn Clock,
    ) -> Self {
        let now = clock.now();
        Self {
            id,
            name: name.into(),
            size,
            skills,
            defense_scores: DefenseScores::from_skills(&skills),
            defense_levels: DefenseLevels::default(),
            resources: 0,
            units: Vec::new(),
            officers: Vec::new(),
            created: now,
            updated: now,
        }
    }

    fn touched(mut self, clock: &dyn Clock) -> Self {
        self.updated = clock.now();
        self
    }

    /// The modifier for one skill.
    #[must_use]
    pub const fn skill_modifier(&self, skill: DomainSkill) -> i32 {
        self.skills.modifier(skill)
    }

    /// Actions available per domain turn: `4 + size`.
    #[must_use]
    pub const fn actions(&self) -> u32 {
        4 + self.size.rank() as u32
    }

    /// Proficiency bonus: `2 + size / 2`.
    #[must_use]
    pub const fn proficiency_bonus(&self) -> i32 {
        self.size.proficiency_bonus()
    }

    /// Merges a partial skill change and recomputes every defense score
    /// from the merged set.
    #[must_use]
    pub fn update_skills(mut self, update: SkillUpdate, clock: &dyn Clock) -> Self {
        self.skills = self.skills.merged(update);
        self.defense_scores = DefenseScores::from_skills(&self.skills);
        self.touched(clock)
    }

    /// Adds to the resource pool.
    #[must_use]
    pub fn add_resources(mut self, amount: u32, clock: &dyn Clock) -> Self {
        self.resources = self.resources.saturating_add(amount);
        self.touched(clock)
    }

    /// Removes from the resource pool, clamping at 0 rather than failing.
    #[must_use]
    pub fn remove_resources(mut self, amount: u32, clock: &dyn Clock) -> Self {
        self.resources = self.resources.saturating_sub(amount);
        self.touched(clock)
    }

    /// Adjusts one defense-level counter by a signed delta.
    #[must_use]
    pub fn adjust_defense_level(mut self, defense: Defense, delta: i32, clock: &dyn Clock) -> Self {
        let level = match defense {
            Defense::Communications => &mut self.defense_levels.communications,
            Defense::Resolve => &mut self.defense_levels.resolve,
            Defense::Resources => &mut self.defense_levels.resources,
        };
        *level += delta;
        self.touched(clock)
    }

    /// Adds a unit id to the membership list. Already-present ids keep
    /// their position.
    #[must_use]
    pub fn add_unit(mut self, unit_id: Uuid, clock: &dyn Clock) -> Self {
        if !self.units.contains(&unit_id) {
            self.units.push(unit_id);
        }
        self.touched(clock)
    }

    /// Removes a unit id from the membership list. Absent ids are a no-op.
    #[must_use]
    pub fn remove_unit(mut self, unit_id: Uuid, clock: &dyn Clock) -> Self {
        self.units.retain(|id| *id != unit_id);
        self.touched(clock)
    }

    /// Adds an officer id. Already-present ids keep their position.
    #[must_use]
    pub fn add_officer(mut self, officer_id: Uuid, clock: &dyn Clock) -> Self {
        if !self.officers.contains(&officer_id) {
            self.officers.push(officer_id);
        }
        self.touched(clock)
    }

    /// Removes an officer id. Absent ids are a no-op.
    #[must_use]
    pub fn remove_officer(mut self, officer_id: Uuid, clock: &dyn Clock) -> Self {
        self.officers.retain(|id| *id != officer_id);
        self.touched(clock)
    }
}

impl Entity for Domain {
    const KIND: EntityKind = EntityKind::Domain;

    fn entity_id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use warmarch_test_support::FixedClock;

    use super::*;

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap())
    }

    fn varn() -> Domain {
        Domain::new(
            Uuid::new_v4(),
            "Varn",
            DomainSize::clamped(3),
            SkillSet {
                diplomacy: 2,
                espionage: 1,
                lore: 0,
                operations: 4,
            },
            &fixed_clock(),
        )
    }

    #[test]
    fn test_defense_scores_computed_at_creation() {
        let domain = varn();
        // communications 10 + (2+1)/2, resolve 10 + (0+4)/2, resources 10 + (2+4)/2.
        assert_eq!(domain.defense_scores.communications, 11);
        assert_eq!(domain.defense_scores.resolve, 12);
        assert_eq!(domain.defense_scores.resources, 13);
    }

    #[test]
    fn test_update_skills_recomputes_only_affected_scores() {
        let domain = varn();
        let before = domain.defense_scores;

        let new_espionage = domain.skills.espionage + 4;
        let domain = domain.update_skills(
            SkillUpdate {
                espionage: Some(new_espionage),
                ..SkillUpdate::default()
            },
            &fixed_clock(),
        );

        assert_eq!(
            domain.defense_scores.communications,
            before.communications + 2
        );
        assert_eq!(domain.defense_scores.resolve, before.resolve);
        assert_eq!(domain.defense_scores.resources, before.resources);
    }

    #[test]
    fn test_update_skills_merges_partial_changes() {
        let domain = varn().update_skills(
            SkillUpdate {
                lore: Some(6),
                ..SkillUpdate::default()
            },
            &fixed_clock(),
        );
        assert_eq!(domain.skills.lore, 6);
        assert_eq!(domain.skills.diplomacy, 2);
        assert_eq!(domain.defense_scores.resolve, 15);
    }

    #[test]
    fn test_negative_skill_sums_floor_downward() {
        let domain = Domain::new(
            Uuid::new_v4(),
            "Ruined March",
            DomainSize::clamped(1),
            SkillSet {
                diplomacy: -1,
                espionage: -2,
                lore: 0,
                operations: 0,
            },
            &fixed_clock(),
        );
        // (-1 + -2) / 2 floors to -2, not -1.
        assert_eq!(domain.defense_scores.communications, 8);
    }

    #[test]
    fn test_actions_and_proficiency_scale_with_size() {
        let small = Domain::new(
            Uuid::new_v4(),
            "Hamlet",
            DomainSize::clamped(1),
            SkillSet::default(),
            &fixed_clock(),
        );
        assert_eq!(small.actions(), 5);
        assert_eq!(small.proficiency_bonus(), 2);
        assert_eq!(small.size.die_sides(), 4);

        let large = Domain::new(
            Uuid::new_v4(),
            "Empire",
            DomainSize::clamped(5),
            SkillSet::default(),
            &fixed_clock(),
        );
        assert_eq!(large.actions(), 9);
        assert_eq!(large.proficiency_bonus(), 4);
        assert_eq!(large.size.die_sides(), 12);
    }

    #[test]
    fn test_size_clamps_and_rejects_out_of_range_deserialization() {
        assert_eq!(DomainSize::clamped(0).rank(), 1);
        assert_eq!(DomainSize::clamped(9).rank(), 5);
        assert!(serde_json::from_value::<DomainSize>(serde_json::json!(6)).is_err());
    }

    #[test]
    fn test_resources_clamp_at_zero() {
        let clock = fixed_clock();
        let domain = varn().add_resources(5, &clock).remove_resources(8, &clock);
        assert_eq!(domain.resources, 0);
    }

    #[test]
    fn test_defense_levels_are_independent_of_skills() {
        let clock = fixed_clock();
        let domain = varn().adjust_defense_level(Defense::Resolve, 2, &clock);
        assert_eq!(domain.defense_levels.resolve, 3);

        let domain = domain.update_skills(
            SkillUpdate {
                lore: Some(10),
                ..SkillUpdate::default()
            },
            &clock,
        );
        assert_eq!(domain.defense_levels.resolve, 3);
    }

    #[test]
    fn test_membership_lists_stay_unique_and_ordered() {
        let clock = fixed_clock();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        let domain = varn()
            .add_unit(first, &clock)
            .add_unit(second, &clock)
            .add_unit(first, &clock);
        assert_eq!(domain.units, vec![first, second]);

        let domain = domain.remove_unit(first, &clock).remove_unit(first, &clock);
        assert_eq!(domain.units, vec![second]);
    }
}
