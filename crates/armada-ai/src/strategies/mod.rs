//! The standard strategies, in chain order.
//!
//! # Modules
//!
//! - [`colonization`] -- settle the nearest free habitable planet
//! - [`research`] -- keep a research project running
//! - [`exploration`] -- send idle scouts to unexplored space
//! - [`economy`] -- keep build queues busy with scouts and warships
//! - [`offense`] -- launch the scheduled offensive
//! - [`static_defense`] -- guard planets with hostile fleets in radar range
//! - [`attack_scheduling`] -- plan when the next offensive is due

pub mod attack_scheduling;
pub mod colonization;
pub mod economy;
pub mod exploration;
pub mod offense;
pub mod research;
pub mod static_defense;

pub use attack_scheduling::AttackSchedulingStrategy;
pub use colonization::ColonizationStrategy;
pub use economy::EconomyStrategy;
pub use exploration::ExplorationStrategy;
pub use offense::OffenseStrategy;
pub use research::ResearchStrategy;
pub use static_defense::StaticDefenseStrategy;

use armada_types::{PlanetSummary, Position, WorldSnapshot};

/// The owned planet closest to `point`.
fn nearest_owned_planet(snapshot: &WorldSnapshot, point: Position) -> Option<&PlanetSummary> {
    snapshot.planets.iter().min_by(|a, b| {
        a.position
            .distance_to(point)
            .total_cmp(&b.position.distance_to(point))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod fixtures {
    //! Snapshot builders shared by strategy tests.

    use armada_types::{
        FactionId, FleetId, FleetRole, FleetSummary, GalaxyBounds, PlanetId, PlanetSummary,
        Position, PriceList, WorldSnapshot,
    };
    use chrono::{NaiveDate, NaiveDateTime};

    pub fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(3000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    pub fn snapshot(faction: FactionId) -> WorldSnapshot {
        let mut snapshot = WorldSnapshot::empty(
            faction,
            1,
            start(),
            GalaxyBounds {
                width: 200.0,
                height: 200.0,
            },
        );
        snapshot.treasury = 500;
        snapshot.prices = PriceList {
            colony: 120,
            scout: 40,
            warship: 90,
            defense: 60,
        };
        snapshot
    }

    pub fn planet(owner: Option<FactionId>, x: f64, y: f64) -> PlanetSummary {
        PlanetSummary {
            id: PlanetId::new(),
            owner,
            position: Position::new(x, y),
            radar_radius: if owner.is_some() { 60.0 } else { 0.0 },
            habitable: true,
            production: 5,
            defense: 0,
            queued_items: 0,
        }
    }

    pub fn fleet(owner: FactionId, role: FleetRole, x: f64, y: f64) -> FleetSummary {
        FleetSummary {
            id: FleetId::new(),
            owner,
            role,
            position: Position::new(x, y),
            radar_radius: 25.0,
            attack: if role == FleetRole::Warfleet { 12 } else { 0 },
            defense: 10,
            destination: None,
            target: None,
        }
    }
}
