//! Faction personality traits read by the AI.
//!
//! The traits are owned by the faction record in the galaxy; the AI only
//! reads them. They parameterize the tactical engine's flee and
//! cost-targeting thresholds.

use serde::{Deserialize, Serialize};

/// Numeric personality of a faction.
///
/// All ratios are non-negative. Their absolute scale is irrelevant to the
/// tactical thresholds except for `social_ratio`, which scales the flee
/// threshold directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactionTraits {
    /// Willingness to preserve units rather than lose them (0.0 -- 1.0).
    pub social_ratio: f64,
    /// Weight given to offensive play.
    pub offensive_ratio: f64,
    /// Weight given to defensive play.
    pub defensive_ratio: f64,
}

impl Default for FactionTraits {
    fn default() -> Self {
        Self {
            social_ratio: 0.5,
            offensive_ratio: 1.0,
            defensive_ratio: 1.0,
        }
    }
}
