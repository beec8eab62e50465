//! One AI faction: decide on a snapshot, commit on the live galaxy.
//!
//! Deciding and committing are split so the scheduler can run
//! [`decide`] on a worker thread with nothing but owned inputs, and later
//! hand the resulting [`Decision`] to [`FactionAi::commit`] on the
//! mutation context.

use armada_types::{Action, Disposition, FactionId, FactionTraits, UnitId, WorldSnapshot};
use armada_world::{AssaultReport, Galaxy, WorldError};
use tracing::{debug, warn};

use crate::battle::BattleContext;
use crate::config::AiConfig;
use crate::error::AiError;
use crate::memory::AiMemory;
use crate::strategy::{StrategyChain, StrategyContext};
use crate::tactics;

/// Output of a successful decide step.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// Strategy that produced the actions, if any.
    pub strategy: Option<&'static str>,
    /// Actions to execute at commit, in order.
    pub actions: Vec<Action>,
    /// Memory after this turn's radar sweep.
    pub memory: AiMemory,
}

/// Counts from one commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    /// Actions applied to the galaxy or memory.
    pub applied: usize,
    /// Actions skipped because an entity they name no longer exists.
    pub stale: usize,
    /// Actions the galaxy refused for another reason.
    pub rejected: usize,
}

/// Run one faction's turn against its snapshot.
///
/// Folds the radar coverage of every owned planet and fleet into the
/// exploration map, then runs the strategy chain. Pure with respect to
/// the galaxy: safe to call off the mutation context.
pub fn decide(
    faction: FactionId,
    snapshot: &WorldSnapshot,
    mut memory: AiMemory,
    chain: &StrategyChain,
    config: &AiConfig,
) -> Result<Decision, AiError> {
    if snapshot.faction != faction {
        return Err(AiError::ForeignSnapshot {
            expected: faction,
            snapshot: snapshot.faction,
        });
    }

    let sources = snapshot
        .planets
        .iter()
        .map(|p| (p.position, p.radar_radius))
        .chain(snapshot.fleets.iter().map(|f| (f.position, f.radar_radius)));
    let mut revealed = 0_usize;
    for (center, radius) in sources {
        let added = memory.exploration.reveal(center, radius, snapshot.bounds);
        revealed = revealed.saturating_add(added);
    }

    let outcome = chain.run(&StrategyContext {
        snapshot,
        memory: &memory,
        config,
    })?;
    debug!(
        faction = %faction,
        tick = snapshot.tick,
        revealed,
        strategy = outcome.strategy.unwrap_or("none"),
        actions = outcome.actions.len(),
        "Turn decided"
    );

    Ok(Decision {
        strategy: outcome.strategy,
        actions: outcome.actions,
        memory,
    })
}

/// Persistent AI state of one faction.
#[derive(Debug, Clone, PartialEq)]
pub struct FactionAi {
    /// Faction this AI plays.
    pub faction: FactionId,
    /// Personality used by tactical decisions.
    pub traits: FactionTraits,
    /// Last committed memory.
    pub memory: AiMemory,
}

impl FactionAi {
    /// Create an AI with the given memory.
    pub const fn new(faction: FactionId, traits: FactionTraits, memory: AiMemory) -> Self {
        Self {
            faction,
            traits,
            memory,
        }
    }

    /// Adopt a decision's memory and execute its actions in order.
    ///
    /// An action naming a vanished planet or fleet is skipped; any other
    /// refusal is logged. Either way the remaining actions still run.
    pub fn commit(&mut self, galaxy: &mut Galaxy, decision: Decision) -> CommitSummary {
        self.memory = decision.memory;
        self.forget_lost_fleets(galaxy);

        let mut summary = CommitSummary::default();
        for action in decision.actions {
            let result = if action.is_memory_only() {
                self.apply_to_memory(galaxy, &action)
            } else {
                galaxy.apply(self.faction, &action)
            };
            match result {
                Ok(()) => summary.applied = summary.applied.saturating_add(1),
                Err(e) if e.is_stale_reference() => {
                    debug!(faction = %self.faction, error = %e, "Skipping stale action");
                    summary.stale = summary.stale.saturating_add(1);
                }
                Err(e) => {
                    warn!(faction = %self.faction, error = %e, ?action, "Action rejected");
                    summary.rejected = summary.rejected.saturating_add(1);
                }
            }
        }
        summary
    }

    fn apply_to_memory(
        &mut self,
        galaxy: &Galaxy,
        action: &Action,
    ) -> Result<(), WorldError> {
        match action {
            Action::SetDefensive { fleet, defensive } => {
                if *defensive {
                    let owned = galaxy
                        .fleet(*fleet)
                        .ok_or(WorldError::FleetNotFound(*fleet))?
                        .owner
                        == self.faction;
                    if !owned {
                        return Err(WorldError::FleetNotOwned {
                            faction: self.faction,
                            fleet: *fleet,
                        });
                    }
                }
                self.memory.set_defensive(*fleet, *defensive);
            }
            Action::ScheduleAttack { at } => self.memory.next_attack_time = Some(*at),
            Action::CancelAttack => self.memory.next_attack_time = None,
            _ => {}
        }
        Ok(())
    }

    /// Drop defensive flags of fleets that no longer exist.
    fn forget_lost_fleets(&mut self, galaxy: &Galaxy) {
        self.memory
            .defensive_fleets
            .retain(|fleet| galaxy.fleet(*fleet).is_some());
    }

    /// Learn from an assault this faction took part in.
    pub fn observe_assault(&mut self, report: &AssaultReport, weight: f64) {
        if report.attacker == self.faction {
            self.memory
                .observe_defense(report.defender, f64::from(report.defense), weight);
        } else if report.defender == self.faction {
            self.memory
                .observe_attack(report.attacker, f64::from(report.attack), weight);
        }
    }

    /// Decide what this faction's idle units do this battle tick.
    pub fn on_battle_tick<B: BattleContext + ?Sized>(
        &self,
        battle: &mut B,
        idle: &[UnitId],
    ) -> Disposition {
        tactics::on_battle_tick(battle, self.faction, &self.traits, &self.memory, idle)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use armada_types::{FleetRole, GalaxyBounds, PlanetId, Position, ProductionItem};
    use armada_world::{EconomyRules, Faction, Fleet, Planet};
    use chrono::NaiveDate;

    use super::*;

    fn setup() -> (Galaxy, FactionId, PlanetId) {
        let mut galaxy = Galaxy::new(
            GalaxyBounds {
                width: 200.0,
                height: 200.0,
            },
            vec!["warp".to_owned()],
            EconomyRules::default(),
        );
        let me = galaxy
            .add_faction(Faction::new("Vega", FactionTraits::default()))
            .unwrap();
        let home = galaxy.add_planet(Planet::unowned("Vega Prime", Position::new(50.0, 50.0), true));
        galaxy.settle(home, me, 20).unwrap();
        galaxy.credit(me, 500).unwrap();
        (galaxy, me, home)
    }

    fn decision(actions: Vec<Action>) -> Decision {
        Decision {
            strategy: Some("test"),
            actions,
            memory: AiMemory::new(25.0),
        }
    }

    #[test]
    fn decide_reveals_radar_before_strategies_run() {
        let me = FactionId::new();
        let mut snapshot = WorldSnapshot::empty(
            me,
            1,
            NaiveDate::from_ymd_opt(3000, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            GalaxyBounds {
                width: 100.0,
                height: 100.0,
            },
        );
        snapshot.planets.push(armada_types::PlanetSummary {
            id: PlanetId::new(),
            owner: Some(me),
            position: Position::new(50.0, 50.0),
            radar_radius: 30.0,
            habitable: true,
            production: 5,
            defense: 0,
            queued_items: 1,
        });

        let decision = decide(
            me,
            &snapshot,
            AiMemory::new(25.0),
            &StrategyChain::standard(),
            &AiConfig::default(),
        )
        .unwrap();

        assert!(decision.memory.exploration.is_explored(Position::new(50.0, 50.0)));
        assert!(decision.actions.is_empty());
        assert_eq!(decision.strategy, None);
    }

    #[test]
    fn decide_rejects_foreign_snapshot() {
        let snapshot = WorldSnapshot::empty(
            FactionId::new(),
            1,
            NaiveDate::from_ymd_opt(3000, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            GalaxyBounds {
                width: 10.0,
                height: 10.0,
            },
        );
        let result = decide(
            FactionId::new(),
            &snapshot,
            AiMemory::new(25.0),
            &StrategyChain::standard(),
            &AiConfig::default(),
        );
        assert!(matches!(result, Err(AiError::ForeignSnapshot { .. })));
    }

    #[test]
    fn stale_actions_are_skipped_and_the_rest_applies() {
        let (mut galaxy, me, home) = setup();
        let mut ai = FactionAi::new(me, FactionTraits::default(), AiMemory::new(25.0));
        let ghost = PlanetId::new();

        let summary = ai.commit(
            &mut galaxy,
            decision(vec![
                Action::QueueProduction {
                    planet: ghost,
                    item: ProductionItem::Scout,
                },
                Action::QueueProduction {
                    planet: home,
                    item: ProductionItem::Scout,
                },
            ]),
        );

        assert_eq!(summary, CommitSummary {
            applied: 1,
            stale: 1,
            rejected: 0,
        });
        assert_eq!(galaxy.planet(home).unwrap().build_queue.len(), 1);
    }

    #[test]
    fn memory_actions_update_memory_only() {
        let (mut galaxy, me, _) = setup();
        let fleet = galaxy.add_fleet(Fleet::new(
            me,
            FleetRole::Warfleet,
            Position::new(50.0, 50.0),
            &EconomyRules::default(),
        ));
        let ghost = armada_types::FleetId::new();
        let at = NaiveDate::from_ymd_opt(3000, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut ai = FactionAi::new(me, FactionTraits::default(), AiMemory::new(25.0));

        let summary = ai.commit(
            &mut galaxy,
            decision(vec![
                Action::SetDefensive {
                    fleet,
                    defensive: true,
                },
                Action::SetDefensive {
                    fleet: ghost,
                    defensive: true,
                },
                Action::ScheduleAttack { at },
            ]),
        );

        assert_eq!(summary.applied, 2);
        assert_eq!(summary.stale, 1);
        assert!(ai.memory.is_defensive(fleet));
        assert!(!ai.memory.is_defensive(ghost));
        assert_eq!(ai.memory.next_attack_time, Some(at));

        ai.commit(&mut galaxy, Decision {
            strategy: None,
            actions: vec![Action::CancelAttack],
            memory: ai.memory.clone(),
        });
        assert_eq!(ai.memory.next_attack_time, None);
        assert!(ai.memory.is_defensive(fleet));
    }

    #[test]
    fn assaults_teach_both_sides() {
        let (a, b) = (FactionId::new(), FactionId::new());
        let report = AssaultReport {
            attacker: a,
            defender: b,
            planet: PlanetId::new(),
            attack: 12,
            defense: 30,
            captured: false,
        };
        let mut attacker = FactionAi::new(a, FactionTraits::default(), AiMemory::new(25.0));
        let mut defender = FactionAi::new(b, FactionTraits::default(), AiMemory::new(25.0));
        attacker.observe_assault(&report, 0.3);
        defender.observe_assault(&report, 0.3);
        assert_eq!(attacker.memory.opponent_strength[&b].defense, Some(30.0));
        assert_eq!(defender.memory.opponent_strength[&a].attack, Some(12.0));
    }
}
