//! Snapshot construction for the prepare phase.
//!
//! [`build_snapshot`] copies everything one faction is allowed to know
//! into a [`WorldSnapshot`]: its own planets and fleets in full, foreign
//! planets inside current radar or in cells it has explored before, and
//! foreign fleets inside current radar only (fleets move; old sightings
//! are not kept).
//!
//! [`SnapshotBuilder`] is the seam the scheduler calls through, so tests
//! and alternative fog-of-war rules can supply their own construction.

use std::collections::BTreeSet;

use armada_ai::AiMemory;
use armada_types::{FactionId, Position, PriceList, ResearchStatus, WorldSnapshot};
use armada_world::{Galaxy, WorldError};
use chrono::NaiveDateTime;

/// Builds per-faction snapshots from the live galaxy.
pub trait SnapshotBuilder: Send + Sync {
    /// Build `faction`'s snapshot for this tick.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::FactionNotFound`] if the faction is unknown.
    fn build(
        &self,
        galaxy: &Galaxy,
        faction: FactionId,
        memory: &AiMemory,
        tick: u64,
        now: NaiveDateTime,
    ) -> Result<WorldSnapshot, WorldError>;
}

/// Radar-and-exploration fog of war.
#[derive(Debug, Clone, Copy, Default)]
pub struct RadarSnapshots;

impl SnapshotBuilder for RadarSnapshots {
    fn build(
        &self,
        galaxy: &Galaxy,
        faction: FactionId,
        memory: &AiMemory,
        tick: u64,
        now: NaiveDateTime,
    ) -> Result<WorldSnapshot, WorldError> {
        build_snapshot(galaxy, faction, memory, tick, now)
    }
}

/// Whether `position` lies inside any radar circle.
fn in_radar(radar: &[(Position, f64)], position: Position) -> bool {
    radar
        .iter()
        .any(|(center, radius)| center.distance_to(position) <= *radius)
}

/// Build one faction's snapshot.
///
/// # Errors
///
/// Returns [`WorldError::FactionNotFound`] if the faction is unknown.
pub fn build_snapshot(
    galaxy: &Galaxy,
    faction: FactionId,
    memory: &AiMemory,
    tick: u64,
    now: NaiveDateTime,
) -> Result<WorldSnapshot, WorldError> {
    let record = galaxy
        .faction(faction)
        .ok_or(WorldError::FactionNotFound(faction))?;
    let rules = galaxy.rules();
    let radar = galaxy.radar_sources(faction);

    let mut snapshot = WorldSnapshot::empty(faction, tick, now, galaxy.bounds());
    snapshot.treasury = record.treasury;
    snapshot.prices = PriceList {
        colony: rules.colony_cost,
        scout: rules.scout_cost,
        warship: rules.warship_cost,
        defense: rules.defense_cost,
    };
    snapshot.research = ResearchStatus {
        current: record.research.current.clone(),
        available: galaxy
            .tech_list()
            .iter()
            .filter(|tech| !record.research.completed.contains(*tech))
            .cloned()
            .collect(),
    };
    snapshot.at_war_with = record.at_war_with.iter().copied().collect::<BTreeSet<_>>();
    snapshot.next_attack_time = memory.next_attack_time;

    for planet in galaxy.planets() {
        if planet.owner == Some(faction) {
            snapshot.planets.push(planet.summary());
        } else if in_radar(&radar, planet.position)
            || memory.exploration.is_explored(planet.position)
        {
            snapshot.known_planets.push(planet.summary());
        }
    }

    for fleet in galaxy.fleets() {
        if fleet.owner == faction {
            snapshot.fleets.push(fleet.summary());
        } else if in_radar(&radar, fleet.position) {
            snapshot.known_fleets.push(fleet.summary());
        }
    }

    Ok(snapshot)
}
