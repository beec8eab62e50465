//! Faction AI for the Armada simulation.
//!
//! An AI faction plays on two time scales. Once per simulation tick it
//! runs a chain of strategies over an immutable [`WorldSnapshot`] and
//! emits deferred [`Action`]s. Once per battle tick it assigns targets to
//! its idle combat units, or flees.
//!
//! # Modules
//!
//! - [`strategy`] -- strategy trait, intent builder and first-match chain
//! - [`strategies`] -- the seven standard strategies
//! - [`tactics`] -- battle-tick targeting and flee decisions
//! - [`battle`] -- battle interface and the in-memory [`SpaceBattle`]
//! - [`memory`] -- per-faction memory (exploration, guards, rivals, schedule)
//! - [`persist`] -- tolerant save/load of memory
//! - [`faction_ai`] -- decide on a snapshot, commit on the galaxy
//! - [`config`] -- strategy tunables
//! - [`error`] -- error types
//!
//! [`WorldSnapshot`]: armada_types::WorldSnapshot
//! [`Action`]: armada_types::Action

pub mod battle;
pub mod config;
pub mod error;
pub mod faction_ai;
pub mod memory;
pub mod persist;
pub mod strategies;
pub mod strategy;
pub mod tactics;

pub use battle::{BattleContext, SpaceBattle};
pub use config::AiConfig;
pub use error::AiError;
pub use faction_ai::{CommitSummary, Decision, FactionAi, decide};
pub use memory::{AiMemory, ExplorationMap, OpponentStrength};
pub use persist::{AiMemoryRecord, DATE_FORMAT, OpponentRecord};
pub use strategy::{ChainOutcome, Intents, Strategy, StrategyChain, StrategyContext};
pub use tactics::{TargetingMode, Thresholds, fleet_health, highest_cost, on_battle_tick};
