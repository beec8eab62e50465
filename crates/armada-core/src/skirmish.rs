//! Space skirmishes between two factions, driven by their AIs.
//!
//! [`stage_battle`] turns the warfleets and defended planets of two
//! factions into combat units. [`fight`] then runs firing rounds, asking
//! each faction's AI to retarget its idle units before every round. A
//! battle start cancels outstanding strategic turns.

use std::collections::{BTreeMap, BTreeSet};

use armada_ai::SpaceBattle;
use armada_types::{CombatUnit, Disposition, FactionId, FleetRole, Position, UnitId, UnitKind};
use armada_world::Galaxy;
use tracing::{debug, info};

use crate::scheduler::{SchedulerError, TurnScheduler};

/// Hull points per point of fleet or planet defense.
const HULL_PER_DEFENSE: u32 = 10;

/// Spacing between units of one side on the battle field.
const LINE_SPACING: f64 = 5.0;

/// How a skirmish ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkirmishSummary {
    /// Firing rounds resolved.
    pub rounds: u32,
    /// Units destroyed, in order.
    pub destroyed: Vec<UnitId>,
    /// Factions that chose to flee at some point.
    pub fled: BTreeSet<FactionId>,
    /// Units still fighting per faction at the end.
    pub survivors: BTreeMap<FactionId, usize>,
}

fn clamp_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn line_position(x: f64, index: u32) -> Position {
    Position::new(x, f64::from(index) * LINE_SPACING)
}

/// Build a battle from the warfleets and defended planets of `a` and `b`.
///
/// Side `a` lines up at the origin and side `b` just inside weapon range,
/// so stations on both sides can reach the opposing line.
pub fn stage_battle(
    galaxy: &Galaxy,
    a: FactionId,
    b: FactionId,
    weapon_range: f64,
    seed: u64,
) -> SpaceBattle {
    let rules = galaxy.rules();
    let mut battle = SpaceBattle::new(weapon_range, seed);

    for (side, x) in [(a, 0.0), (b, weapon_range * 0.8)] {
        let mut slot = 0_u32;

        for fleet in galaxy
            .fleets()
            .filter(|f| f.owner == side && f.role == FleetRole::Warfleet)
        {
            let hull = fleet.defense.max(1).saturating_mul(HULL_PER_DEFENSE);
            battle.add_unit(CombatUnit {
                id: UnitId::new(),
                owner: side,
                fleet: Some(fleet.id),
                kind: UnitKind::Ship,
                hp: hull,
                hp_max: hull,
                shield: fleet.defense,
                shield_max: fleet.defense,
                value: clamp_u32(rules.warship_cost),
                position: line_position(x, slot),
                firepower: fleet.attack,
                attack: None,
                guard: false,
                withdrawn: false,
            });
            slot = slot.saturating_add(1);
        }

        for planet in galaxy
            .planets()
            .filter(|p| p.owner == Some(side) && p.defense > 0)
        {
            let hull = planet.defense.saturating_mul(HULL_PER_DEFENSE);
            let levels = u64::from(
                planet
                    .defense
                    .checked_div(rules.defense_per_level)
                    .unwrap_or(1),
            )
            .max(1);
            battle.add_unit(CombatUnit {
                id: UnitId::new(),
                owner: side,
                fleet: None,
                kind: UnitKind::Station,
                hp: hull,
                hp_max: hull,
                shield: 0,
                shield_max: 0,
                value: clamp_u32(rules.defense_cost.saturating_mul(levels)),
                position: line_position(x, slot),
                firepower: (planet.defense / 2).max(1),
                attack: None,
                guard: true,
                withdrawn: false,
            });
            slot = slot.saturating_add(1);
        }
    }

    debug!(
        battle = %battle.id(),
        units = battle.units().count(),
        "Battle staged"
    );
    battle
}

/// Fight `battle` for at most `max_rounds` rounds.
///
/// # Errors
///
/// Returns [`SchedulerError::UnknownFaction`] if a faction in the battle
/// has no registered AI.
pub fn fight(
    scheduler: &mut TurnScheduler,
    battle: &mut SpaceBattle,
    max_rounds: u32,
) -> Result<SkirmishSummary, SchedulerError> {
    let cancelled = scheduler.cancel_outstanding();
    info!(battle = %battle.id(), cancelled, "Battle started");

    let mut summary = SkirmishSummary::default();
    while summary.rounds < max_rounds && !battle.is_over() {
        for faction in battle.factions() {
            let idle = battle.idle_units(faction);
            if idle.is_empty() {
                continue;
            }
            if scheduler.on_battle_tick(faction, battle, &idle)? == Disposition::Flee {
                summary.fled.insert(faction);
            }
        }
        summary.destroyed.extend(battle.exchange_fire());
        summary.rounds = summary.rounds.saturating_add(1);
    }

    for unit in battle.units().filter(|u| u.is_active()) {
        let count = summary.survivors.entry(unit.owner).or_insert(0);
        *count = count.saturating_add(1);
    }
    info!(
        battle = %battle.id(),
        rounds = summary.rounds,
        destroyed = summary.destroyed.len(),
        fled = summary.fled.len(),
        "Battle over"
    );
    Ok(summary)
}
