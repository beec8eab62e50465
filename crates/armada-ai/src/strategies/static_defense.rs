//! Static defense: keep a guard on planets with hostile fleets nearby.

use std::collections::BTreeSet;

use armada_types::{FleetId, FleetRole, FleetSummary, Position, ProductionItem};

use crate::error::AiError;
use crate::strategy::{Intents, Strategy, StrategyContext};

/// Distance under which a fleet counts as stationed at a planet.
const STATION_RADIUS: f64 = 1.0;

/// For each owned planet with a hostile warfleet inside its radar range
/// and no guard, flags the nearest idle warfleet as defensive and sends
/// it there. With no fleet to spare, a weak planet queues a defense
/// level instead. Once no threat is in sight, idle guards are released.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticDefenseStrategy;

fn near(a: Position, b: Position) -> bool {
    a.distance_to(b) <= STATION_RADIUS
}

impl Strategy for StaticDefenseStrategy {
    fn name(&self) -> &'static str {
        "static_defense"
    }

    fn run(&self, ctx: &StrategyContext<'_>, intents: &mut Intents) -> Result<(), AiError> {
        let snapshot = ctx.snapshot;
        let memory = ctx.memory;

        let threats: Vec<&FleetSummary> = snapshot
            .known_fleets
            .iter()
            .filter(|f| f.role == FleetRole::Warfleet && snapshot.at_war_with.contains(&f.owner))
            .collect();
        let guards: Vec<&FleetSummary> = snapshot
            .fleets
            .iter()
            .filter(|f| memory.is_defensive(f.id))
            .collect();

        let mut any_threat = false;
        let mut assigned: BTreeSet<FleetId> = BTreeSet::new();
        let mut treasury = snapshot.treasury;

        for planet in &snapshot.planets {
            let threatened = threats
                .iter()
                .any(|t| t.position.distance_to(planet.position) <= planet.radar_radius);
            if !threatened {
                continue;
            }
            any_threat = true;

            let guarded = guards.iter().any(|g| {
                near(g.position, planet.position)
                    || g.destination.is_some_and(|d| near(d, planet.position))
            });
            if guarded {
                continue;
            }

            let spare = snapshot
                .idle_fleets(FleetRole::Warfleet)
                .filter(|f| !memory.is_defensive(f.id) && !assigned.contains(&f.id))
                .min_by(|a, b| {
                    a.position
                        .distance_to(planet.position)
                        .total_cmp(&b.position.distance_to(planet.position))
                });
            if let Some(fleet) = spare {
                assigned.insert(fleet.id);
                intents.set_defensive(fleet.id, true);
                intents.move_fleet(fleet.id, planet.position);
            } else if planet.defense < ctx.config.defense_target
                && planet.queued_items == 0
                && treasury >= snapshot.prices.defense
            {
                treasury = treasury.saturating_sub(snapshot.prices.defense);
                intents.queue(planet.id, ProductionItem::Defense);
            }
        }

        if !any_threat {
            for guard in guards.iter().filter(|g| g.is_idle()) {
                intents.set_defensive(guard.id, false);
            }
        }
        Ok(())
    }
}
