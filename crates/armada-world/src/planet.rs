//! Planets and their build queues.

use std::collections::VecDeque;

use armada_types::{FactionId, PlanetId, PlanetSummary, Position, ProductionItem};
use serde::{Deserialize, Serialize};

/// An item in a planet's build queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOrder {
    /// What is being built.
    pub item: ProductionItem,
    /// Ticks until completion.
    pub remaining_ticks: u32,
}

/// A planet in the galaxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    /// Planet identifier.
    pub id: PlanetId,
    /// Display name.
    pub name: String,
    /// Position on the galaxy plane.
    pub position: Position,
    /// Current owner, if colonized.
    pub owner: Option<FactionId>,
    /// Whether the planet can be colonized.
    pub habitable: bool,
    /// Production points yielded per tick to the owner.
    pub production: u32,
    /// Planetary defense strength.
    pub defense: u32,
    /// Radar radius projected while owned.
    pub radar_radius: f64,
    /// Items waiting to be built, front first.
    pub build_queue: VecDeque<BuildOrder>,
}

impl Planet {
    /// Create an unowned planet.
    pub fn unowned(name: &str, position: Position, habitable: bool) -> Self {
        Self {
            id: PlanetId::new(),
            name: name.to_owned(),
            position,
            owner: None,
            habitable,
            production: 0,
            defense: 0,
            radar_radius: 0.0,
            build_queue: VecDeque::new(),
        }
    }

    /// Build the AI-facing summary of this planet.
    pub fn summary(&self) -> PlanetSummary {
        PlanetSummary {
            id: self.id,
            owner: self.owner,
            position: self.position,
            radar_radius: if self.owner.is_some() {
                self.radar_radius
            } else {
                0.0
            },
            habitable: self.habitable,
            production: self.production,
            defense: self.defense,
            queued_items: u32::try_from(self.build_queue.len()).unwrap_or(u32::MAX),
        }
    }
}
