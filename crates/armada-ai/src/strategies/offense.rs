//! Offense: launch the scheduled assault once it is due.

use armada_types::{FleetRole, FleetSummary};

use crate::error::AiError;
use crate::strategy::{Intents, Strategy, StrategyContext};

/// When the scheduled attack time has passed, sends every idle,
/// non-defensive warfleet against the weakest known hostile planet the
/// combined force can overcome, then clears the schedule.
///
/// Produces nothing while the force is below `min_offense_attack` or no
/// suitable target is known; the schedule then stays in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffenseStrategy;

impl Strategy for OffenseStrategy {
    fn name(&self) -> &'static str {
        "offense"
    }

    fn run(&self, ctx: &StrategyContext<'_>, intents: &mut Intents) -> Result<(), AiError> {
        let snapshot = ctx.snapshot;
        let Some(due) = ctx.memory.next_attack_time else {
            return Ok(());
        };
        if snapshot.now < due {
            return Ok(());
        }

        let attackers: Vec<&FleetSummary> = snapshot
            .idle_fleets(FleetRole::Warfleet)
            .filter(|f| !ctx.memory.is_defensive(f.id))
            .collect();
        let force = attackers
            .iter()
            .map(|f| u64::from(f.attack))
            .fold(0, u64::saturating_add);
        if force < u64::from(ctx.config.min_offense_attack) {
            return Ok(());
        }

        let Some(target) = snapshot
            .hostile_planets()
            .filter(|p| u64::from(p.defense) < force)
            .min_by_key(|p| p.defense)
        else {
            return Ok(());
        };

        for fleet in attackers {
            intents.attack(fleet.id, target.id);
        }
        intents.cancel_attack();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use armada_types::{Action, FactionId, WorldSnapshot};
    use chrono::TimeDelta;

    use super::*;
    use crate::config::AiConfig;
    use crate::memory::AiMemory;
    use crate::strategies::fixtures;

    fn run(snapshot: &WorldSnapshot, memory: &AiMemory) -> Vec<Action> {
        let config = AiConfig::default();
        let ctx = StrategyContext {
            snapshot,
            memory,
            config: &config,
        };
        let mut intents = Intents::new();
        OffenseStrategy.run(&ctx, &mut intents).unwrap();
        intents.into_actions()
    }

    fn war_snapshot() -> (WorldSnapshot, FactionId) {
        let me = FactionId::new();
        let rival = FactionId::new();
        let mut snapshot = fixtures::snapshot(me);
        snapshot.at_war_with = BTreeSet::from([rival]);
        (snapshot, rival)
    }

    #[test]
    fn due_attack_hits_weakest_hostile_planet() {
        let (mut snapshot, rival) = war_snapshot();
        let me = snapshot.faction;
        let mut strong = fixtures::planet(Some(rival), 100.0, 100.0);
        strong.defense = 20;
        let mut weak = fixtures::planet(Some(rival), 150.0, 100.0);
        weak.defense = 5;
        snapshot.known_planets = vec![strong, weak.clone()];
        let a = fixtures::fleet(me, FleetRole::Warfleet, 0.0, 0.0);
        let b = fixtures::fleet(me, FleetRole::Warfleet, 0.0, 0.0);
        let guard = fixtures::fleet(me, FleetRole::Warfleet, 0.0, 0.0);
        snapshot.fleets = vec![a.clone(), b.clone(), guard.clone()];

        let mut memory = AiMemory::new(25.0);
        memory.next_attack_time = Some(fixtures::start());
        memory.set_defensive(guard.id, true);

        assert_eq!(
            run(&snapshot, &memory),
            vec![
                Action::AttackPlanet {
                    fleet: a.id,
                    target: weak.id,
                },
                Action::AttackPlanet {
                    fleet: b.id,
                    target: weak.id,
                },
                Action::CancelAttack,
            ]
        );
    }

    #[test]
    fn waits_until_due() {
        let (mut snapshot, rival) = war_snapshot();
        let me = snapshot.faction;
        snapshot.known_planets = vec![fixtures::planet(Some(rival), 100.0, 100.0)];
        snapshot.fleets = vec![
            fixtures::fleet(me, FleetRole::Warfleet, 0.0, 0.0),
            fixtures::fleet(me, FleetRole::Warfleet, 0.0, 0.0),
        ];
        let mut memory = AiMemory::new(25.0);
        memory.next_attack_time = fixtures::start().checked_add_signed(TimeDelta::hours(1));

        assert!(run(&snapshot, &memory).is_empty());
    }

    #[test]
    fn weak_force_holds_back() {
        let (mut snapshot, rival) = war_snapshot();
        let me = snapshot.faction;
        snapshot.known_planets = vec![fixtures::planet(Some(rival), 100.0, 100.0)];
        snapshot.fleets = vec![fixtures::fleet(me, FleetRole::Warfleet, 0.0, 0.0)];
        let mut memory = AiMemory::new(25.0);
        memory.next_attack_time = Some(fixtures::start());

        assert!(run(&snapshot, &memory).is_empty());
    }
}
