//! Per-tick tactical decisions for one faction in one battle.
//!
//! Each battle tick, [`on_battle_tick`] looks at the faction's remaining
//! health and picks one of three behaviours for its idle units:
//!
//! 1. **Flee** when health drops strictly below the flee threshold.
//!    Idle units are withdrawn.
//! 2. **Cost-focused** when health is below the cost threshold, or the
//!    fleet in battle is flagged defensive. Every idle unit targets the
//!    most valuable enemy it can reach relative to its remaining health.
//! 3. **Default** otherwise. Stations and projectors guard and shoot a
//!    random enemy in range. Ships spread round-robin over the enemies
//!    already being targeted this pass, or over all enemies if none are.
//!
//! Thresholds derive from faction traits:
//! `cost = defensive / (offensive + defensive)` and `flee = social * cost`.

use armada_types::{CombatUnit, Disposition, FactionId, FactionTraits, UnitId};
use tracing::debug;

use crate::battle::BattleContext;
use crate::memory::AiMemory;

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Health ratios that switch a faction's battle behaviour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Below this health the faction focuses its most valuable targets.
    pub cost_attack: f64,
    /// Below this health the faction flees.
    pub flee: f64,
}

impl Thresholds {
    /// Derive thresholds from faction traits.
    ///
    /// When both offensive and defensive ratios are zero the cost
    /// threshold is zero, so the faction neither flees nor switches mode.
    pub fn from_traits(traits: &FactionTraits) -> Self {
        let total = traits.offensive_ratio + traits.defensive_ratio;
        let cost_attack = if total > 0.0 {
            traits.defensive_ratio / total
        } else {
            0.0
        };
        Self {
            cost_attack,
            flee: traits.social_ratio * cost_attack,
        }
    }
}

/// Which targeting rule a non-fleeing faction used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetingMode {
    /// Most valuable target per remaining health point.
    CostFocused,
    /// Random for stations, spread for ships.
    Default,
}

// ---------------------------------------------------------------------------
// Health and target value
// ---------------------------------------------------------------------------

/// Combined remaining health of a set of units as a fraction of their
/// combined maximum, counting shields.
///
/// Returns `None` for an empty set or a zero maximum.
#[allow(clippy::cast_precision_loss)]
pub fn fleet_health<'a>(units: impl IntoIterator<Item = &'a CombatUnit>) -> Option<f64> {
    let (current, max) = units.into_iter().fold((0_u64, 0_u64), |(c, m), u| {
        (c.saturating_add(u.health()), m.saturating_add(u.health_max()))
    });
    if max == 0 {
        return None;
    }
    Some(current as f64 / max as f64)
}

/// A unit with no health left or no maximum cannot be ranked.
const fn is_rankable(unit: &CombatUnit) -> bool {
    unit.is_active() && unit.health() > 0 && unit.health_max() > 0
}

/// Whether `challenger` is worth strictly more than `incumbent`.
///
/// Compares `value * max / current` without division by cross-multiplying.
fn outranks(challenger: &CombatUnit, incumbent: &CombatUnit) -> bool {
    let score = |a: &CombatUnit, b: &CombatUnit| {
        u128::from(a.value)
            .saturating_mul(u128::from(a.health_max()))
            .saturating_mul(u128::from(b.health()))
    };
    score(challenger, incumbent) > score(incumbent, challenger)
}

/// The candidate with the highest value per remaining health point.
///
/// Ties keep the earlier candidate. Destroyed, withdrawn and zero-health
/// units are skipped.
pub fn highest_cost<B: BattleContext + ?Sized>(
    battle: &B,
    candidates: &[UnitId],
) -> Option<UnitId> {
    let mut best: Option<&CombatUnit> = None;
    for unit in candidates.iter().filter_map(|id| battle.unit(*id)) {
        if !is_rankable(unit) {
            continue;
        }
        match best {
            Some(current) if !outranks(unit, current) => {}
            _ => best = Some(unit),
        }
    }
    best.map(|u| u.id)
}

// ---------------------------------------------------------------------------
// Battle tick
// ---------------------------------------------------------------------------

/// Decide what `faction`'s idle units do this battle tick.
///
/// Only writes the `attack` and `guard` fields of the faction's own idle
/// units, or withdraws them when fleeing. Busy units are not touched.
pub fn on_battle_tick<B: BattleContext + ?Sized>(
    battle: &mut B,
    faction: FactionId,
    traits: &FactionTraits,
    memory: &AiMemory,
    idle: &[UnitId],
) -> Disposition {
    let idle: Vec<UnitId> = idle
        .iter()
        .copied()
        .filter(|id| {
            battle
                .unit(*id)
                .is_some_and(|u| u.owner == faction && u.is_active())
        })
        .collect();
    if idle.is_empty() {
        return Disposition::Continue;
    }

    let (health, defensive) = {
        let units = battle.units_of(faction);
        let defensive = units
            .iter()
            .any(|u| u.fleet.is_some_and(|f| memory.is_defensive(f)));
        (fleet_health(units), defensive)
    };
    let Some(health) = health else {
        return Disposition::Continue;
    };

    let thresholds = Thresholds::from_traits(traits);
    if health < thresholds.flee {
        debug!(faction = %faction, health, flee = thresholds.flee, "Fleeing battle");
        for unit in idle {
            battle.withdraw(unit);
        }
        return Disposition::Flee;
    }

    let mode = if health < thresholds.cost_attack || defensive {
        cost_focused(battle, &idle);
        TargetingMode::CostFocused
    } else {
        default_targeting(battle, &idle);
        TargetingMode::Default
    };
    debug!(faction = %faction, health, ?mode, idle = idle.len(), "Assigned targets");
    Disposition::Continue
}

fn cost_focused<B: BattleContext + ?Sized>(battle: &mut B, idle: &[UnitId]) {
    for &id in idle {
        let candidates = battle.enemies_in_range(id);
        let target = highest_cost(&*battle, &candidates);
        if let Some(unit) = battle.unit_mut(id) {
            unit.attack = target;
        }
    }
}

fn default_targeting<B: BattleContext + ?Sized>(battle: &mut B, idle: &[UnitId]) {
    let (stationary, ships): (Vec<UnitId>, Vec<UnitId>) = idle
        .iter()
        .copied()
        .partition(|id| battle.unit(*id).is_some_and(|u| u.kind.is_stationary()));

    for id in stationary {
        let candidates = battle.enemies_in_range(id);
        let target = battle.random(&candidates);
        if let Some(unit) = battle.unit_mut(id) {
            unit.guard = true;
            unit.attack = target;
        }
    }

    let Some(&first) = ships.first() else {
        return;
    };
    let enemies = battle.enemies_of(first);
    let mut pool: Vec<UnitId> = Vec::new();
    for target in idle
        .iter()
        .filter_map(|id| battle.unit(*id).and_then(|u| u.attack))
    {
        if enemies.contains(&target) && !pool.contains(&target) {
            pool.push(target);
        }
    }
    if pool.is_empty() {
        pool = enemies;
    }
    battle.shuffle(&mut pool);

    for (index, id) in ships.into_iter().enumerate() {
        let target = index
            .checked_rem(pool.len())
            .and_then(|slot| pool.get(slot))
            .copied();
        if let Some(unit) = battle.unit_mut(id) {
            unit.attack = target;
        }
    }
}
