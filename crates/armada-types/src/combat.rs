//! Combat units as seen by the tactical engine.
//!
//! The battle simulator owns these records. The tactical engine reads the
//! hit-point fields and writes only `attack`, `guard` and `withdrawn`.

use serde::{Deserialize, Serialize};

use crate::geometry::Position;
use crate::ids::{FactionId, FleetId, UnitId};

/// The kind of a combat unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Mobile warship.
    Ship,
    /// Stationary orbital station.
    Station,
    /// Stationary shield or weapon projector.
    Projector,
}

impl UnitKind {
    /// Stations and projectors cannot move and guard their position.
    pub const fn is_stationary(self) -> bool {
        matches!(self, Self::Station | Self::Projector)
    }
}

/// A faction's per-battle disposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disposition {
    /// Keep fighting.
    Continue,
    /// Withdraw idle units from the battle.
    Flee,
}

/// One structure taking part in a space battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatUnit {
    /// Unit identifier.
    pub id: UnitId,
    /// Owning faction.
    pub owner: FactionId,
    /// Fleet the unit belongs to, if any (stations have none).
    pub fleet: Option<FleetId>,
    /// Unit kind.
    pub kind: UnitKind,
    /// Current hull points.
    pub hp: u32,
    /// Maximum hull points.
    pub hp_max: u32,
    /// Current shield points.
    pub shield: u32,
    /// Maximum shield points.
    pub shield_max: u32,
    /// Relative cost of the unit.
    pub value: u32,
    /// Position on the battle field.
    pub position: Position,
    /// Damage dealt per volley.
    pub firepower: u32,
    /// Current target, written by the tactical engine.
    pub attack: Option<UnitId>,
    /// Whether the unit holds position, written by the tactical engine.
    pub guard: bool,
    /// Whether the unit has left the battle.
    pub withdrawn: bool,
}

impl CombatUnit {
    /// Current hull plus shield.
    pub const fn health(&self) -> u64 {
        self.hp as u64 + self.shield as u64
    }

    /// Maximum hull plus shield.
    pub const fn health_max(&self) -> u64 {
        self.hp_max as u64 + self.shield_max as u64
    }

    /// A unit with no hull left is destroyed.
    pub const fn is_destroyed(&self) -> bool {
        self.hp == 0
    }

    /// Whether the unit still takes part in the fight.
    pub const fn is_active(&self) -> bool {
        !self.is_destroyed() && !self.withdrawn
    }
}
