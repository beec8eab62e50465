//! Economic and military constants for the galaxy.
//!
//! [`EconomyRules`] bundles every tunable so that the engine can load them
//! from `armada-config.yaml` and tests can override individual values.

use serde::{Deserialize, Serialize};

/// Galaxy-wide economy and unit parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyRules {
    /// Treasury cost of launching a colony ship (default: 120).
    pub colony_cost: u64,
    /// Treasury cost of building a scout (default: 40).
    pub scout_cost: u64,
    /// Treasury cost of building a warship (default: 90).
    pub warship_cost: u64,
    /// Treasury cost of one defense level (default: 60).
    pub defense_cost: u64,
    /// Ticks a queued item takes to complete (default: 3).
    pub build_ticks: u32,
    /// Research points needed per technology (default: 50).
    pub research_cost: u32,
    /// Research points generated per owned planet per tick (default: 2).
    pub research_per_planet: u32,
    /// Production of a freshly colonized planet (default: 5).
    pub colony_production: u32,
    /// Radar radius of an owned planet (default: 60.0).
    pub planet_radar: f64,
    /// Defense added per completed defense item (default: 10).
    pub defense_per_level: u32,
    /// Scout movement per tick (default: 12.0).
    pub scout_speed: f64,
    /// Scout radar radius (default: 45.0).
    pub scout_radar: f64,
    /// Warship movement per tick (default: 8.0).
    pub warship_speed: f64,
    /// Warship radar radius (default: 25.0).
    pub warship_radar: f64,
    /// Attack strength of a new warfleet (default: 12).
    pub warship_attack: u32,
    /// Defense strength of a new warfleet (default: 10).
    pub warship_defense: u32,
    /// Colony ship movement per tick (default: 6.0).
    pub colony_speed: f64,
}

impl Default for EconomyRules {
    fn default() -> Self {
        Self {
            colony_cost: 120,
            scout_cost: 40,
            warship_cost: 90,
            defense_cost: 60,
            build_ticks: 3,
            research_cost: 50,
            research_per_planet: 2,
            colony_production: 5,
            planet_radar: 60.0,
            defense_per_level: 10,
            scout_speed: 12.0,
            scout_radar: 45.0,
            warship_speed: 8.0,
            warship_radar: 25.0,
            warship_attack: 12,
            warship_defense: 10,
            colony_speed: 6.0,
        }
    }
}

impl EconomyRules {
    /// Treasury cost of a production item.
    pub const fn cost_of(&self, item: armada_types::ProductionItem) -> u64 {
        match item {
            armada_types::ProductionItem::Scout => self.scout_cost,
            armada_types::ProductionItem::Warship => self.warship_cost,
            armada_types::ProductionItem::Defense => self.defense_cost,
        }
    }
}
