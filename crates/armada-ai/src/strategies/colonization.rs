//! Colonization: settle free habitable planets near home.

use super::nearest_owned_planet;
use crate::error::AiError;
use crate::strategy::{Intents, Strategy, StrategyContext};

/// Launches one colony ship per tick toward the closest unclaimed
/// habitable planet within reach, if the treasury can pay for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColonizationStrategy;

impl Strategy for ColonizationStrategy {
    fn name(&self) -> &'static str {
        "colonization"
    }

    fn run(&self, ctx: &StrategyContext<'_>, intents: &mut Intents) -> Result<(), AiError> {
        let snapshot = ctx.snapshot;
        if snapshot.treasury < snapshot.prices.colony {
            return Ok(());
        }

        let best = snapshot
            .known_planets
            .iter()
            .filter(|p| p.owner.is_none() && p.habitable && !snapshot.is_targeted(p.id))
            .filter_map(|target| {
                let source = nearest_owned_planet(snapshot, target.position)?;
                let distance = source.position.distance_to(target.position);
                (distance <= ctx.config.max_colony_distance).then_some((source, target, distance))
            })
            .min_by(|a, b| a.2.total_cmp(&b.2));

        if let Some((source, target, _)) = best {
            intents.colonize(source.id, target.id);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use armada_types::{Action, FactionId, FleetRole};

    use super::*;
    use crate::config::AiConfig;
    use crate::memory::AiMemory;
    use crate::strategies::fixtures;

    fn run(snapshot: &armada_types::WorldSnapshot) -> Vec<Action> {
        let memory = AiMemory::new(25.0);
        let config = AiConfig::default();
        let ctx = StrategyContext {
            snapshot,
            memory: &memory,
            config: &config,
        };
        let mut intents = Intents::new();
        ColonizationStrategy.run(&ctx, &mut intents).unwrap();
        intents.into_actions()
    }

    #[test]
    fn colonizes_nearest_free_planet() {
        let me = FactionId::new();
        let mut snapshot = fixtures::snapshot(me);
        let home = fixtures::planet(Some(me), 10.0, 10.0);
        let near = fixtures::planet(None, 30.0, 10.0);
        let far = fixtures::planet(None, 90.0, 10.0);
        snapshot.planets.push(home.clone());
        snapshot.known_planets = vec![home.clone(), far, near.clone()];

        assert_eq!(
            run(&snapshot),
            vec![Action::Colonize {
                source: home.id,
                target: near.id,
            }]
        );
    }

    #[test]
    fn skips_planets_already_targeted() {
        let me = FactionId::new();
        let mut snapshot = fixtures::snapshot(me);
        let home = fixtures::planet(Some(me), 10.0, 10.0);
        let near = fixtures::planet(None, 30.0, 10.0);
        let mut ship = fixtures::fleet(me, FleetRole::ColonyShip, 20.0, 10.0);
        ship.target = Some(near.id);
        ship.destination = Some(near.position);
        snapshot.planets.push(home.clone());
        snapshot.known_planets = vec![home, near];
        snapshot.fleets.push(ship);

        assert!(run(&snapshot).is_empty());
    }

    #[test]
    fn needs_enough_treasury() {
        let me = FactionId::new();
        let mut snapshot = fixtures::snapshot(me);
        snapshot.treasury = 119;
        let home = fixtures::planet(Some(me), 10.0, 10.0);
        snapshot.planets.push(home.clone());
        snapshot.known_planets = vec![home, fixtures::planet(None, 30.0, 10.0)];

        assert!(run(&snapshot).is_empty());
    }
}
