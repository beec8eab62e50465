//! Deferred actions emitted by strategies and executed at commit.
//!
//! An [`Action`] is plain data describing one intended change. Strategies
//! never touch the live galaxy; they return ordered lists of actions which
//! the scheduler executes, in order, on the mutation context once the
//! faction's decide task has finished.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::geometry::Position;
use crate::ids::{FleetId, PlanetId};

/// An item a planet can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProductionItem {
    /// A new scout fleet.
    Scout,
    /// A new warfleet.
    Warship,
    /// One level of planetary defense.
    Defense,
}

/// One deferred mutation requested by a faction's AI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Launch a colony ship from an owned planet toward an unowned one.
    Colonize {
        /// Owned planet the colony ship departs from.
        source: PlanetId,
        /// Unowned habitable planet to settle.
        target: PlanetId,
    },
    /// Begin researching a technology.
    StartResearch {
        /// Technology name.
        tech: String,
    },
    /// Send a fleet to a point in space.
    MoveFleet {
        /// Fleet to move.
        fleet: FleetId,
        /// Destination point.
        destination: Position,
    },
    /// Add an item to a planet's build queue.
    QueueProduction {
        /// Owned planet that builds the item.
        planet: PlanetId,
        /// What to build.
        item: ProductionItem,
    },
    /// Order a warfleet to attack a hostile planet.
    AttackPlanet {
        /// Attacking fleet.
        fleet: FleetId,
        /// Target planet.
        target: PlanetId,
    },
    /// Mark or unmark a fleet as defensive in AI memory.
    SetDefensive {
        /// Fleet to flag.
        fleet: FleetId,
        /// New flag value.
        defensive: bool,
    },
    /// Schedule the next offensive in AI memory.
    ScheduleAttack {
        /// Game date of the next offensive.
        at: NaiveDateTime,
    },
    /// Clear the scheduled offensive in AI memory.
    CancelAttack,
}

impl Action {
    /// Whether the action only touches the faction's AI memory.
    pub const fn is_memory_only(&self) -> bool {
        matches!(
            self,
            Self::SetDefensive { .. } | Self::ScheduleAttack { .. } | Self::CancelAttack
        )
    }
}
