//! The battle interface the tactical engine drives, and an in-memory
//! battle that implements it.
//!
//! The tactical engine never owns units. It reads and writes them through
//! [`BattleContext`], which also supplies randomness so that a seeded
//! battle replays identically.

use std::collections::{BTreeMap, BTreeSet};

use armada_types::{BattleId, CombatUnit, FactionId, UnitId};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::{IndexedRandom, SliceRandom};

/// Services a battle offers to the per-faction tactical decision.
pub trait BattleContext {
    /// Look up a unit.
    fn unit(&self, id: UnitId) -> Option<&CombatUnit>;

    /// Look up a unit for writing its `attack` and `guard` fields.
    fn unit_mut(&mut self, id: UnitId) -> Option<&mut CombatUnit>;

    /// Every unit of `faction` still fighting.
    fn units_of(&self, faction: FactionId) -> Vec<&CombatUnit>;

    /// Every fighting unit hostile to `unit`.
    fn enemies_of(&self, unit: UnitId) -> Vec<UnitId>;

    /// Hostile fighting units `unit` can fire on this round.
    fn enemies_in_range(&self, unit: UnitId) -> Vec<UnitId>;

    /// Pick one candidate uniformly at random.
    fn random(&mut self, candidates: &[UnitId]) -> Option<UnitId>;

    /// Shuffle candidates in place.
    fn shuffle(&mut self, candidates: &mut [UnitId]);

    /// Pull a unit out of the fight.
    fn withdraw(&mut self, unit: UnitId);
}

// ---------------------------------------------------------------------------
// SpaceBattle
// ---------------------------------------------------------------------------

/// A self-contained battle between two or more factions.
///
/// Ships close on their targets and may fire at any range; stations and
/// projectors only reach enemies within `weapon_range`.
#[derive(Debug, Clone)]
pub struct SpaceBattle {
    /// Battle identifier.
    id: BattleId,
    /// Units in the battle indexed by ID.
    units: BTreeMap<UnitId, CombatUnit>,
    /// Reach of stationary weapons.
    weapon_range: f64,
    /// Seeded randomness for targeting.
    rng: SmallRng,
    /// Number of completed firing rounds.
    round: u32,
}

impl SpaceBattle {
    /// Start an empty battle.
    pub fn new(weapon_range: f64, seed: u64) -> Self {
        Self {
            id: BattleId::new(),
            units: BTreeMap::new(),
            weapon_range,
            rng: SmallRng::seed_from_u64(seed),
            round: 0,
        }
    }

    /// Add a unit to the battle.
    pub fn add_unit(&mut self, unit: CombatUnit) -> UnitId {
        let id = unit.id;
        self.units.insert(id, unit);
        id
    }

    /// Battle identifier.
    pub const fn id(&self) -> BattleId {
        self.id
    }

    /// Completed firing rounds.
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// All units, including destroyed and withdrawn ones.
    pub fn units(&self) -> impl Iterator<Item = &CombatUnit> {
        self.units.values()
    }

    /// Factions with at least one unit still fighting.
    pub fn factions(&self) -> BTreeSet<FactionId> {
        self.units
            .values()
            .filter(|u| u.is_active())
            .map(|u| u.owner)
            .collect()
    }

    /// The battle ends when fewer than two factions are still fighting.
    pub fn is_over(&self) -> bool {
        self.factions().len() < 2
    }

    /// Units of `faction` without a live target.
    pub fn idle_units(&self, faction: FactionId) -> Vec<UnitId> {
        self.units
            .values()
            .filter(|u| u.owner == faction && u.is_active())
            .filter(|u| {
                u.attack
                    .and_then(|target| self.units.get(&target))
                    .is_none_or(|target| !target.is_active())
            })
            .map(|u| u.id)
            .collect()
    }

    /// Ships reach anything; stationary shooters only what is in range.
    fn reaches(&self, shooter: &CombatUnit, target: &CombatUnit) -> bool {
        !shooter.kind.is_stationary()
            || shooter.position.distance_to(target.position) <= self.weapon_range
    }

    /// Resolve one round of fire. Returns the units destroyed.
    ///
    /// Damage is absorbed by shields first. Units whose target was
    /// destroyed or withdrew lose that target and become idle.
    pub fn exchange_fire(&mut self) -> Vec<UnitId> {
        let volleys: Vec<(UnitId, u32)> = self
            .units
            .values()
            .filter(|u| u.is_active() && u.firepower > 0)
            .filter_map(|shooter| {
                let target = self.units.get(&shooter.attack?)?;
                (target.is_active()
                    && target.owner != shooter.owner
                    && self.reaches(shooter, target))
                    .then_some((target.id, shooter.firepower))
            })
            .collect();

        let mut destroyed = Vec::new();
        for (target, damage) in volleys {
            let Some(unit) = self.units.get_mut(&target) else {
                continue;
            };
            if unit.is_destroyed() {
                continue;
            }
            let absorbed = damage.min(unit.shield);
            unit.shield = unit.shield.saturating_sub(absorbed);
            unit.hp = unit.hp.saturating_sub(damage.saturating_sub(absorbed));
            if unit.is_destroyed() {
                destroyed.push(target);
            }
        }

        let inactive: BTreeSet<UnitId> = self
            .units
            .values()
            .filter(|u| !u.is_active())
            .map(|u| u.id)
            .collect();
        for unit in self.units.values_mut() {
            if unit.attack.is_some_and(|t| inactive.contains(&t)) {
                unit.attack = None;
            }
        }

        self.round = self.round.saturating_add(1);
        destroyed
    }
}

impl BattleContext for SpaceBattle {
    fn unit(&self, id: UnitId) -> Option<&CombatUnit> {
        self.units.get(&id)
    }

    fn unit_mut(&mut self, id: UnitId) -> Option<&mut CombatUnit> {
        self.units.get_mut(&id)
    }

    fn units_of(&self, faction: FactionId) -> Vec<&CombatUnit> {
        self.units
            .values()
            .filter(|u| u.owner == faction && u.is_active())
            .collect()
    }

    fn enemies_of(&self, unit: UnitId) -> Vec<UnitId> {
        let Some(me) = self.units.get(&unit) else {
            return Vec::new();
        };
        self.units
            .values()
            .filter(|u| u.owner != me.owner && u.is_active())
            .map(|u| u.id)
            .collect()
    }

    fn enemies_in_range(&self, unit: UnitId) -> Vec<UnitId> {
        let Some(me) = self.units.get(&unit) else {
            return Vec::new();
        };
        self.units
            .values()
            .filter(|u| u.owner != me.owner && u.is_active() && self.reaches(me, u))
            .map(|u| u.id)
            .collect()
    }

    fn random(&mut self, candidates: &[UnitId]) -> Option<UnitId> {
        candidates.choose(&mut self.rng).copied()
    }

    fn shuffle(&mut self, candidates: &mut [UnitId]) {
        candidates.shuffle(&mut self.rng);
    }

    fn withdraw(&mut self, unit: UnitId) {
        if let Some(unit) = self.units.get_mut(&unit) {
            unit.withdrawn = true;
            unit.attack = None;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use armada_types::{Position, UnitKind};

    use super::*;

    /// A unit with the given stats, owned by `owner`.
    pub fn unit(owner: FactionId, kind: UnitKind, hp: u32, hp_max: u32, value: u32) -> CombatUnit {
        CombatUnit {
            id: UnitId::new(),
            owner,
            fleet: None,
            kind,
            hp,
            hp_max,
            shield: 0,
            shield_max: 0,
            value,
            position: Position::default(),
            firepower: 10,
            attack: None,
            guard: false,
            withdrawn: false,
        }
    }

    #[test]
    fn shields_absorb_before_hull() {
        let (a, b) = (FactionId::new(), FactionId::new());
        let mut battle = SpaceBattle::new(50.0, 1);
        let mut shooter = unit(a, UnitKind::Ship, 10, 10, 1);
        let mut target = unit(b, UnitKind::Ship, 20, 20, 1);
        target.shield = 4;
        target.shield_max = 4;
        shooter.attack = Some(target.id);
        let target_id = battle.add_unit(target);
        battle.add_unit(shooter);

        assert!(battle.exchange_fire().is_empty());
        let hit = battle.unit(target_id).unwrap();
        assert_eq!((hit.shield, hit.hp), (0, 14));
        assert_eq!(battle.round(), 1);
    }

    #[test]
    fn destroyed_targets_free_their_attackers() {
        let (a, b) = (FactionId::new(), FactionId::new());
        let mut battle = SpaceBattle::new(50.0, 1);
        let mut shooter = unit(a, UnitKind::Ship, 10, 10, 1);
        let target = unit(b, UnitKind::Ship, 5, 20, 1);
        shooter.attack = Some(target.id);
        let target_id = battle.add_unit(target);
        let shooter_id = battle.add_unit(shooter);

        assert_eq!(battle.exchange_fire(), vec![target_id]);
        assert!(battle.unit(shooter_id).unwrap().attack.is_none());
        assert_eq!(battle.idle_units(a), vec![shooter_id]);
        assert!(battle.is_over());
    }

    #[test]
    fn stations_only_reach_targets_in_range() {
        let (a, b) = (FactionId::new(), FactionId::new());
        let mut battle = SpaceBattle::new(10.0, 1);
        let station = unit(a, UnitKind::Station, 50, 50, 5);
        let mut near = unit(b, UnitKind::Ship, 10, 10, 1);
        near.position = Position::new(5.0, 0.0);
        let mut far = unit(b, UnitKind::Ship, 10, 10, 1);
        far.position = Position::new(50.0, 0.0);
        let station_id = battle.add_unit(station);
        let near_id = battle.add_unit(near);
        let far_id = battle.add_unit(far);

        assert_eq!(battle.enemies_in_range(station_id), vec![near_id]);
        let mut all = battle.enemies_of(station_id);
        all.sort();
        let mut expected = vec![near_id, far_id];
        expected.sort();
        assert_eq!(all, expected);
    }

    #[test]
    fn ships_reach_enemies_beyond_weapon_range() {
        let (a, b) = (FactionId::new(), FactionId::new());
        let mut battle = SpaceBattle::new(10.0, 1);
        let ship = battle.add_unit(unit(a, UnitKind::Ship, 10, 10, 1));
        let mut far = unit(b, UnitKind::Ship, 10, 10, 1);
        far.position = Position::new(500.0, 0.0);
        let far = battle.add_unit(far);

        assert_eq!(battle.enemies_in_range(ship), vec![far]);
        battle.unit_mut(ship).unwrap().attack = Some(far);
        battle.exchange_fire();
        assert_eq!(battle.unit(far).unwrap().hp, 0);
    }

    #[test]
    fn withdrawn_units_leave_the_fight() {
        let (a, b) = (FactionId::new(), FactionId::new());
        let mut battle = SpaceBattle::new(10.0, 1);
        let mine = battle.add_unit(unit(a, UnitKind::Ship, 10, 10, 1));
        battle.add_unit(unit(b, UnitKind::Ship, 10, 10, 1));
        battle.withdraw(mine);
        assert!(battle.units_of(a).is_empty());
        assert!(battle.is_over());
    }
}
