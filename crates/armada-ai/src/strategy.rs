//! The strategy chain: an ordered list of pluggable decision procedures.
//!
//! Each [`Strategy`] looks at the faction's [`WorldSnapshot`] and memory
//! and records the changes it wants through an [`Intents`] builder. The
//! [`StrategyChain`] runs strategies in order and stops at the first one
//! that produced at least one action; later strategies are not invoked
//! that tick.
//!
//! Strategies never see the live galaxy. Their only write surface is the
//! [`Intents`] list, which is executed at commit.

use armada_types::{Action, FleetId, PlanetId, Position, ProductionItem, WorldSnapshot};
use chrono::NaiveDateTime;

use crate::config::AiConfig;
use crate::error::AiError;
use crate::memory::AiMemory;
use crate::strategies::{
    AttackSchedulingStrategy, ColonizationStrategy, EconomyStrategy, ExplorationStrategy,
    OffenseStrategy, ResearchStrategy, StaticDefenseStrategy,
};

/// Read-only inputs handed to every strategy.
#[derive(Debug, Clone, Copy)]
pub struct StrategyContext<'a> {
    /// The faction's view of the galaxy this tick.
    pub snapshot: &'a WorldSnapshot,
    /// The faction's memory as of this tick's radar sweep.
    pub memory: &'a AiMemory,
    /// Shared strategy tunables.
    pub config: &'a AiConfig,
}

/// Ordered list of deferred actions a strategy wants executed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Intents {
    /// Recorded actions in emission order.
    actions: Vec<Action>,
}

impl Intents {
    /// An empty intent list.
    pub const fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// Record an arbitrary action.
    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Launch a colony ship from `source` to `target`.
    pub fn colonize(&mut self, source: PlanetId, target: PlanetId) {
        self.push(Action::Colonize { source, target });
    }

    /// Begin researching `tech`.
    pub fn start_research(&mut self, tech: impl Into<String>) {
        self.push(Action::StartResearch { tech: tech.into() });
    }

    /// Send `fleet` toward `destination`.
    pub fn move_fleet(&mut self, fleet: FleetId, destination: Position) {
        self.push(Action::MoveFleet { fleet, destination });
    }

    /// Queue `item` on `planet`.
    pub fn queue(&mut self, planet: PlanetId, item: ProductionItem) {
        self.push(Action::QueueProduction { planet, item });
    }

    /// Order `fleet` to assault `target`.
    pub fn attack(&mut self, fleet: FleetId, target: PlanetId) {
        self.push(Action::AttackPlanet { fleet, target });
    }

    /// Flag or unflag `fleet` as defensive.
    pub fn set_defensive(&mut self, fleet: FleetId, defensive: bool) {
        self.push(Action::SetDefensive { fleet, defensive });
    }

    /// Schedule the next offensive.
    pub fn schedule_attack(&mut self, at: NaiveDateTime) {
        self.push(Action::ScheduleAttack { at });
    }

    /// Clear the scheduled offensive.
    pub fn cancel_attack(&mut self) {
        self.push(Action::CancelAttack);
    }

    /// Number of recorded actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Take the recorded actions.
    pub fn into_actions(self) -> Vec<Action> {
        self.actions
    }
}

/// One pluggable decision procedure.
///
/// Implementations must be pure with respect to the world: everything
/// they learn comes from the context, and everything they want done goes
/// into `intents`.
pub trait Strategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Analyze the context and record intended actions.
    fn run(&self, ctx: &StrategyContext<'_>, intents: &mut Intents) -> Result<(), AiError>;
}

/// Result of running a chain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainOutcome {
    /// The strategy that produced the actions, if any did.
    pub strategy: Option<&'static str>,
    /// Actions to execute at commit, in order.
    pub actions: Vec<Action>,
}

/// An ordered sequence of strategies evaluated first-match.
pub struct StrategyChain {
    /// Strategies in evaluation order.
    strategies: Vec<Box<dyn Strategy>>,
}

impl std::fmt::Debug for StrategyChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl StrategyChain {
    /// Build a chain from strategies in evaluation order.
    pub fn new(strategies: Vec<Box<dyn Strategy>>) -> Self {
        Self { strategies }
    }

    /// The default chain: colonize, research, explore, build, attack,
    /// defend, then plan the next offensive.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(ColonizationStrategy),
            Box::new(ResearchStrategy),
            Box::new(ExplorationStrategy),
            Box::new(EconomyStrategy),
            Box::new(OffenseStrategy),
            Box::new(StaticDefenseStrategy),
            Box::new(AttackSchedulingStrategy),
        ])
    }

    /// Strategy names in evaluation order.
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run strategies in order until one produces actions.
    ///
    /// A strategy error ends the chain for this tick; the faction then
    /// produces no actions.
    pub fn run(&self, ctx: &StrategyContext<'_>) -> Result<ChainOutcome, AiError> {
        for strategy in &self.strategies {
            let mut intents = Intents::new();
            strategy.run(ctx, &mut intents)?;
            if !intents.is_empty() {
                return Ok(ChainOutcome {
                    strategy: Some(strategy.name()),
                    actions: intents.into_actions(),
                });
            }
        }
        Ok(ChainOutcome::default())
    }
}

impl Default for StrategyChain {
    fn default() -> Self {
        Self::standard()
    }
}
