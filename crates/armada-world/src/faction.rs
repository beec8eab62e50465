//! Faction records: treasury, research, diplomacy and traits.

use std::collections::BTreeSet;

use armada_types::{FactionId, FactionTraits};
use serde::{Deserialize, Serialize};

/// Research progress of a faction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Research {
    /// Technology currently being researched.
    pub current: Option<String>,
    /// Points accumulated toward `current`.
    pub progress: u32,
    /// Technologies already researched.
    pub completed: BTreeSet<String>,
}

/// A faction in the galaxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faction {
    /// Faction identifier.
    pub id: FactionId,
    /// Display name.
    pub name: String,
    /// Personality traits read by the AI.
    pub traits: FactionTraits,
    /// Whether the faction is driven by the AI scheduler.
    pub ai_controlled: bool,
    /// Factions this faction is at war with.
    pub at_war_with: BTreeSet<FactionId>,
    /// Production points available for orders.
    pub treasury: u64,
    /// Research state.
    pub research: Research,
}

impl Faction {
    /// Create an AI-controlled faction with an empty treasury.
    pub fn new(name: &str, traits: FactionTraits) -> Self {
        Self {
            id: FactionId::new(),
            name: name.to_owned(),
            traits,
            ai_controlled: true,
            at_war_with: BTreeSet::new(),
            treasury: 0,
            research: Research::default(),
        }
    }
}
