//! Tunables for faction strategies.
//!
//! [`AiConfig`] is loaded from the `ai` section of `armada-config.yaml`.
//! Every field has a default so partial sections are accepted.

use serde::{Deserialize, Serialize};

/// Parameters shared by all strategies of every AI faction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Side length of an exploration grid cell (default: 25.0).
    pub exploration_cell_size: f64,

    /// Farthest distance from an owned planet a colony target may lie
    /// (default: 160.0).
    pub max_colony_distance: f64,

    /// Number of scouts a faction keeps while unexplored space remains
    /// (default: 1).
    pub scouts_wanted: usize,

    /// Warfleets a faction keeps per owned planet (default: 1).
    pub warfleets_per_planet: usize,

    /// Combined idle attack required before an offensive launches
    /// (default: 20).
    pub min_offense_attack: u32,

    /// Planet defense below which a threatened planet asks for a guard
    /// (default: 30).
    pub defense_target: u32,

    /// Base delay between scheduling and launching an offensive, in game
    /// hours (default: 72).
    pub attack_delay_hours: i64,

    /// Weight given to a new opponent observation, between 0 and 1
    /// (default: 0.3).
    pub opponent_smoothing: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            exploration_cell_size: 25.0,
            max_colony_distance: 160.0,
            scouts_wanted: 1,
            warfleets_per_planet: 1,
            min_offense_attack: 20,
            defense_target: 30,
            attack_delay_hours: 72,
            opponent_smoothing: 0.3,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn partial_section_keeps_defaults() {
        let config: AiConfig = serde_json::from_str(r#"{"scouts_wanted": 3}"#).unwrap();
        assert_eq!(config.scouts_wanted, 3);
        assert_eq!(config.attack_delay_hours, 72);
    }
}
