//! Fleets: scouts, warfleets and colony ships.

use armada_types::{FactionId, FleetId, FleetRole, FleetSummary, PlanetId, Position};
use serde::{Deserialize, Serialize};

use crate::rules::EconomyRules;

/// A fleet in the galaxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    /// Fleet identifier.
    pub id: FleetId,
    /// Owning faction.
    pub owner: FactionId,
    /// What the fleet is built for.
    pub role: FleetRole,
    /// Current position.
    pub position: Position,
    /// Where the fleet is headed, if moving.
    pub destination: Option<Position>,
    /// Planet to colonize or attack on arrival.
    pub target: Option<PlanetId>,
    /// Distance covered per tick.
    pub speed: f64,
    /// Radar radius.
    pub radar_radius: f64,
    /// Attack strength.
    pub attack: u32,
    /// Defense strength.
    pub defense: u32,
}

impl Fleet {
    /// Create an idle fleet of the given role using the rule-book stats.
    pub fn new(owner: FactionId, role: FleetRole, position: Position, rules: &EconomyRules) -> Self {
        let (speed, radar_radius, attack, defense) = match role {
            FleetRole::Scout => (rules.scout_speed, rules.scout_radar, 0, 1),
            FleetRole::Warfleet => (
                rules.warship_speed,
                rules.warship_radar,
                rules.warship_attack,
                rules.warship_defense,
            ),
            FleetRole::ColonyShip => (rules.colony_speed, 0.0, 0, 1),
        };
        Self {
            id: FleetId::new(),
            owner,
            role,
            position,
            destination: None,
            target: None,
            speed,
            radar_radius,
            attack,
            defense,
        }
    }

    /// Build the AI-facing summary of this fleet.
    pub const fn summary(&self) -> FleetSummary {
        FleetSummary {
            id: self.id,
            owner: self.owner,
            role: self.role,
            position: self.position,
            radar_radius: self.radar_radius,
            attack: self.attack,
            defense: self.defense,
            destination: self.destination,
            target: self.target,
        }
    }
}
