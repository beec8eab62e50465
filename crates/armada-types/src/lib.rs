//! Shared value types for the Armada faction AI.
//!
//! Everything that crosses a crate boundary lives here: identifiers, galaxy
//! geometry, faction traits, the per-tick [`WorldSnapshot`], the deferred
//! [`Action`] vocabulary and the combat unit record read by the tactical
//! engine.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all entity identifiers
//! - [`geometry`] -- Positions, galaxy bounds and exploration grid cells
//! - [`faction`] -- Faction personality traits
//! - [`snapshot`] -- The per-faction read-only world view
//! - [`actions`] -- Deferred actions produced by strategies
//! - [`combat`] -- Combat units and battle dispositions

pub mod actions;
pub mod combat;
pub mod faction;
pub mod geometry;
pub mod ids;
pub mod snapshot;

// Re-export all public types at crate root for convenience.
pub use actions::{Action, ProductionItem};
pub use combat::{CombatUnit, Disposition, UnitKind};
pub use faction::FactionTraits;
pub use geometry::{GalaxyBounds, GridCell, ParseCellError, Position};
pub use ids::{BattleId, FactionId, FleetId, PlanetId, UnitId};
pub use snapshot::{
    FleetRole, FleetSummary, PlanetSummary, PriceList, ResearchStatus, WorldSnapshot,
};
