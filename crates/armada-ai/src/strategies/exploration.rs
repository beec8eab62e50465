//! Exploration: push scouts into space the radar has never covered.

use std::collections::BTreeSet;

use armada_types::{FleetRole, GridCell};

use crate::error::AiError;
use crate::strategy::{Intents, Strategy, StrategyContext};

/// Sends every idle scout to the nearest unexplored grid cell, never
/// sending two scouts to the same cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplorationStrategy;

impl Strategy for ExplorationStrategy {
    fn name(&self) -> &'static str {
        "exploration"
    }

    fn run(&self, ctx: &StrategyContext<'_>, intents: &mut Intents) -> Result<(), AiError> {
        let snapshot = ctx.snapshot;
        let map = &ctx.memory.exploration;

        // Cells already claimed by scouts under way.
        let mut claimed: BTreeSet<GridCell> = snapshot
            .fleets
            .iter()
            .filter(|f| f.role == FleetRole::Scout)
            .filter_map(|f| f.destination)
            .map(|d| GridCell::containing(d, map.cell_size()))
            .collect();

        for scout in snapshot.idle_fleets(FleetRole::Scout) {
            let Some((cell, point)) =
                map.nearest_unexplored(scout.position, snapshot.bounds, &claimed)
            else {
                break;
            };
            claimed.insert(cell);
            intents.move_fleet(scout.id, point);
        }
        Ok(())
    }
}
