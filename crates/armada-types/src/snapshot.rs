//! The per-faction, per-tick read-only view of the galaxy.
//!
//! A [`WorldSnapshot`] is built once per tick for each AI faction during the
//! prepare phase, handed by value to that faction's decide task, and
//! dropped once the faction's turn has committed. It never references the
//! live galaxy.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::geometry::{GalaxyBounds, Position};
use crate::ids::{FactionId, FleetId, PlanetId};

/// What a fleet is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FleetRole {
    /// Unarmed, long-radar explorer.
    Scout,
    /// Armed combat fleet.
    Warfleet,
    /// Carries colonists to an unowned habitable planet.
    ColonyShip,
}

/// Summary of one planet as seen by a faction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetSummary {
    /// Planet identifier.
    pub id: PlanetId,
    /// Current owner, if colonized.
    pub owner: Option<FactionId>,
    /// Planet position.
    pub position: Position,
    /// Radar radius projected by the planet (zero if unowned).
    pub radar_radius: f64,
    /// Whether the planet can be colonized.
    pub habitable: bool,
    /// Production points the planet yields per tick when owned.
    pub production: u32,
    /// Planetary defense strength.
    pub defense: u32,
    /// Number of items waiting in the planet's build queue.
    pub queued_items: u32,
}

/// Summary of one fleet as seen by a faction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetSummary {
    /// Fleet identifier.
    pub id: FleetId,
    /// Owning faction.
    pub owner: FactionId,
    /// Fleet role.
    pub role: FleetRole,
    /// Current position.
    pub position: Position,
    /// Radar radius projected by the fleet.
    pub radar_radius: f64,
    /// Aggregate attack strength.
    pub attack: u32,
    /// Aggregate defense strength.
    pub defense: u32,
    /// Where the fleet is headed, if moving.
    pub destination: Option<Position>,
    /// Planet the fleet is ordered to colonize or attack, if any.
    pub target: Option<PlanetId>,
}

impl FleetSummary {
    /// A fleet with no destination is free for new orders.
    pub const fn is_idle(&self) -> bool {
        self.destination.is_none()
    }
}

/// Research state of a faction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchStatus {
    /// Technology currently being researched.
    pub current: Option<String>,
    /// Technologies not yet researched, in tech-list order.
    pub available: Vec<String>,
}

/// Treasury cost of each order the AI can place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceList {
    /// Cost of launching a colony ship.
    pub colony: u64,
    /// Cost of building a scout.
    pub scout: u64,
    /// Cost of building a warship.
    pub warship: u64,
    /// Cost of one planetary defense level.
    pub defense: u64,
}

/// Immutable per-faction copy of the galaxy state the AI needs for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// The faction this snapshot was built for.
    pub faction: FactionId,
    /// Tick number the snapshot was taken at.
    pub tick: u64,
    /// Game date the snapshot was taken at.
    pub now: NaiveDateTime,
    /// Production points in the faction treasury.
    pub treasury: u64,
    /// Current order prices.
    pub prices: PriceList,
    /// Research state.
    pub research: ResearchStatus,
    /// Planets owned by the faction.
    pub planets: Vec<PlanetSummary>,
    /// Foreign or unowned planets the faction knows about.
    pub known_planets: Vec<PlanetSummary>,
    /// Fleets owned by the faction.
    pub fleets: Vec<FleetSummary>,
    /// Foreign fleets currently inside the faction's radar.
    pub known_fleets: Vec<FleetSummary>,
    /// Factions this faction is at war with.
    pub at_war_with: BTreeSet<FactionId>,
    /// Galaxy extent.
    pub bounds: GalaxyBounds,
    /// Scheduled next offensive, carried over from AI memory.
    pub next_attack_time: Option<NaiveDateTime>,
}

impl WorldSnapshot {
    /// Create an empty snapshot for a faction at a point in time.
    pub const fn empty(
        faction: FactionId,
        tick: u64,
        now: NaiveDateTime,
        bounds: GalaxyBounds,
    ) -> Self {
        Self {
            faction,
            tick,
            now,
            treasury: 0,
            prices: PriceList {
                colony: 0,
                scout: 0,
                warship: 0,
                defense: 0,
            },
            research: ResearchStatus {
                current: None,
                available: Vec::new(),
            },
            planets: Vec::new(),
            known_planets: Vec::new(),
            fleets: Vec::new(),
            known_fleets: Vec::new(),
            at_war_with: BTreeSet::new(),
            bounds,
            next_attack_time: None,
        }
    }

    /// Own fleets with the given role and no current orders.
    pub fn idle_fleets(&self, role: FleetRole) -> impl Iterator<Item = &FleetSummary> {
        self.fleets
            .iter()
            .filter(move |fleet| fleet.role == role && fleet.is_idle())
    }

    /// Known planets owned by a faction this faction is at war with.
    pub fn hostile_planets(&self) -> impl Iterator<Item = &PlanetSummary> {
        self.known_planets.iter().filter(|planet| {
            planet
                .owner
                .is_some_and(|owner| self.at_war_with.contains(&owner))
        })
    }

    /// Whether one of the faction's own fleets already targets `planet`.
    pub fn is_targeted(&self, planet: PlanetId) -> bool {
        self.fleets.iter().any(|fleet| fleet.target == Some(planet))
    }
}
