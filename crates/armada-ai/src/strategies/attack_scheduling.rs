//! Attack scheduling: decide when the next offensive is due.

use armada_types::FleetRole;
use chrono::TimeDelta;

use crate::error::AiError;
use crate::strategy::{Intents, Strategy, StrategyContext};

/// Shortest and longest multiples of the base delay.
const DELAY_SCALE: (f64, f64) = (0.5, 4.0);

/// While at war with nothing scheduled, schedules the next offensive.
///
/// The delay is `attack_delay_hours` scaled by how the strongest rival's
/// learned planet defense compares with the faction's own total warfleet
/// attack. Without observations the base delay is used.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttackSchedulingStrategy;

impl Strategy for AttackSchedulingStrategy {
    fn name(&self) -> &'static str {
        "attack_scheduling"
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn run(&self, ctx: &StrategyContext<'_>, intents: &mut Intents) -> Result<(), AiError> {
        let snapshot = ctx.snapshot;
        if ctx.memory.next_attack_time.is_some() || snapshot.at_war_with.is_empty() {
            return Ok(());
        }

        let own_attack: f64 = snapshot
            .fleets
            .iter()
            .filter(|f| f.role == FleetRole::Warfleet)
            .map(|f| f64::from(f.attack))
            .sum();
        let rival_defense = snapshot
            .at_war_with
            .iter()
            .filter_map(|r| ctx.memory.opponent_strength.get(r))
            .filter_map(|s| s.defense)
            .max_by(f64::total_cmp);

        let scale = match rival_defense {
            Some(defense) if own_attack > 0.0 => {
                (defense / own_attack).clamp(DELAY_SCALE.0, DELAY_SCALE.1)
            }
            Some(_) => DELAY_SCALE.1,
            None => 1.0,
        };
        let hours = ((ctx.config.attack_delay_hours as f64) * scale).round().max(1.0) as i64;

        let at = TimeDelta::try_hours(hours)
            .and_then(|delay| snapshot.now.checked_add_signed(delay))
            .ok_or_else(|| AiError::CalendarOverflow {
                context: format!("scheduling an attack {hours}h after {}", snapshot.now),
            })?;
        intents.schedule_attack(at);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use armada_types::{Action, FactionId, WorldSnapshot};

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
        AttackSchedulingStrategy.run(&ctx, &mut intents).unwrap();
        intents.into_actions()
    }

    fn at_war() -> (WorldSnapshot, FactionId) {
        let me = FactionId::new();
        let rival = FactionId::new();
        let mut snapshot = fixtures::snapshot(me);
        snapshot.at_war_with = BTreeSet::from([rival]);
        snapshot
            .fleets
            .push(fixtures::fleet(me, FleetRole::Warfleet, 0.0, 0.0));
        (snapshot, rival)
    }

    #[test]
    fn base_delay_without_observations() {
        let (snapshot, _) = at_war();
        assert_eq!(
            run(&snapshot, &AiMemory::new(25.0)),
            vec![Action::ScheduleAttack {
                at: fixtures::start() + TimeDelta::hours(72),
            }]
        );
    }

    #[test]
    fn strong_rival_pushes_attack_back() {
        let (snapshot, rival) = at_war();
        let mut memory = AiMemory::new(25.0);
        memory.observe_defense(rival, 24.0, 0.3);
        assert_eq!(
            run(&snapshot, &memory),
            vec![Action::ScheduleAttack {
                at: fixtures::start() + TimeDelta::hours(144),
            }]
        );
    }

    #[test]
    fn peace_or_existing_schedule_is_left_alone() {
        let (mut snapshot, _) = at_war();
        let mut memory = AiMemory::new(25.0);
        memory.next_attack_time = Some(fixtures::start());
        assert!(run(&snapshot, &memory).is_empty());

        snapshot.at_war_with.clear();
        assert!(run(&snapshot, &AiMemory::new(25.0)).is_empty());
    }
}
