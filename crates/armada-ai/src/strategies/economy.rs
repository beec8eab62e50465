//! Economy: keep idle shipyards building.

use armada_types::{FleetRole, ProductionItem};

use crate::error::AiError;
use crate::strategy::{Intents, Strategy, StrategyContext};

/// Queues one item per tick on the first owned planet with an empty
/// build queue: a scout while unexplored space remains and scouts are
/// short, otherwise a warship while the fleet is below its target size.
#[derive(Debug, Clone, Copy, Default)]
pub struct EconomyStrategy;

impl Strategy for EconomyStrategy {
    fn name(&self) -> &'static str {
        "economy"
    }

    fn run(&self, ctx: &StrategyContext<'_>, intents: &mut Intents) -> Result<(), AiError> {
        let snapshot = ctx.snapshot;
        let Some(yard) = snapshot.planets.iter().find(|p| p.queued_items == 0) else {
            return Ok(());
        };

        let count = |role| snapshot.fleets.iter().filter(|f| f.role == role).count();
        let pending: usize = snapshot
            .planets
            .iter()
            .map(|p| usize::try_from(p.queued_items).unwrap_or(usize::MAX))
            .fold(0, usize::saturating_add);

        let unexplored = ctx.memory.exploration.unexplored_count(snapshot.bounds) > 0;
        if unexplored
            && count(FleetRole::Scout) < ctx.config.scouts_wanted
            && snapshot.treasury >= snapshot.prices.scout
        {
            intents.queue(yard.id, ProductionItem::Scout);
            return Ok(());
        }

        let wanted = snapshot
            .planets
            .len()
            .saturating_mul(ctx.config.warfleets_per_planet);
        if count(FleetRole::Warfleet).saturating_add(pending) < wanted
            && snapshot.treasury >= snapshot.prices.warship
        {
            intents.queue(yard.id, ProductionItem::Warship);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use armada_types::{Action, FactionId, WorldSnapshot};

    use super::*;
    use crate::config::AiConfig;
    use crate::memory::AiMemory;
    use crate::strategies::fixtures;

    fn run(snapshot: &WorldSnapshot) -> Vec<Action> {
        let memory = AiMemory::new(25.0);
        let config = AiConfig::default();
        let ctx = StrategyContext {
            snapshot,
            memory: &memory,
            config: &config,
        };
        let mut intents = Intents::new();
        EconomyStrategy.run(&ctx, &mut intents).unwrap();
        intents.into_actions()
    }

    #[test]
    fn builds_a_scout_first() {
        let me = FactionId::new();
        let mut snapshot = fixtures::snapshot(me);
        let home = fixtures::planet(Some(me), 10.0, 10.0);
        snapshot.planets.push(home.clone());

        assert_eq!(
            run(&snapshot),
            vec![Action::QueueProduction {
                planet: home.id,
                item: ProductionItem::Scout,
            }]
        );
    }

    #[test]
    fn builds_warships_once_scouted() {
        let me = FactionId::new();
        let mut snapshot = fixtures::snapshot(me);
        let home = fixtures::planet(Some(me), 10.0, 10.0);
        snapshot.planets.push(home.clone());
        snapshot
            .fleets
            .push(fixtures::fleet(me, FleetRole::Scout, 0.0, 0.0));

        assert_eq!(
            run(&snapshot),
            vec![Action::QueueProduction {
                planet: home.id,
                item: ProductionItem::Warship,
            }]
        );
    }

    #[test]
    fn busy_yards_are_left_alone() {
        let me = FactionId::new();
        let mut snapshot = fixtures::snapshot(me);
        let mut home = fixtures::planet(Some(me), 10.0, 10.0);
        home.queued_items = 1;
        snapshot.planets.push(home);

        assert!(run(&snapshot).is_empty());
    }

    #[test]
    fn full_fleet_builds_nothing() {
        let me = FactionId::new();
        let mut snapshot = fixtures::snapshot(me);
        snapshot.planets.push(fixtures::planet(Some(me), 10.0, 10.0));
        snapshot
            .fleets
            .push(fixtures::fleet(me, FleetRole::Scout, 0.0, 0.0));
        snapshot
            .fleets
            .push(fixtures::fleet(me, FleetRole::Warfleet, 0.0, 0.0));

        assert!(run(&snapshot).is_empty());
    }
}
