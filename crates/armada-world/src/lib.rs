//! Authoritative galaxy state for the Armada simulation.
//!
//! This crate models the mutable world the faction AIs act upon: planets
//! with production and build queues, fleets that move and fight, factions
//! with treasuries, research and diplomacy. The AI never holds a reference
//! to a [`Galaxy`] during its decide phase; it only reads snapshots and
//! emits actions that the scheduler applies here on the mutation context.
//!
//! # Modules
//!
//! - [`error`] -- Error types for galaxy operations ([`WorldError`]).
//! - [`faction`] -- Faction records (treasury, research, diplomacy).
//! - [`fleet`] -- Fleets and their rule-book stats.
//! - [`galaxy`] -- The [`Galaxy`] container, per-tick advance, action application.
//! - [`planet`] -- Planets and build queues.
//! - [`rules`] -- Economy and unit parameters ([`EconomyRules`]).
//! - [`starting_galaxy`] -- Default three-faction starting galaxy.

pub mod error;
pub mod faction;
pub mod fleet;
pub mod galaxy;
pub mod planet;
pub mod rules;
pub mod starting_galaxy;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use faction::{Faction, Research};
pub use fleet::Fleet;
pub use galaxy::{AdvanceSummary, AssaultReport, Galaxy};
pub use planet::{BuildOrder, Planet};
pub use rules::EconomyRules;
pub use starting_galaxy::{StartingFactions, create_starting_galaxy};
