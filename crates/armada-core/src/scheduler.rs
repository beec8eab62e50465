//! The turn scheduler: snapshot, decide and commit for every AI faction.
//!
//! Each tick the scheduler runs a three-phase turn for every faction whose
//! previous turn has fully committed:
//!
//! 1. **Prepare.** One snapshot task per eligible faction reads the
//!    galaxy under a shared lock. The scheduler waits for all of them,
//!    bounded by `snapshot_timeout_ms`. On timeout the outstanding tasks
//!    are aborted and the tick is abandoned; nothing is committed.
//! 2. **Decide.** One task per faction runs the strategy chain on a
//!    blocking worker against that faction's own snapshot and memory
//!    clone. No shared mutable state is touched.
//! 3. **Commit.** Each finished decide task posts a [`TurnOutcome`] to
//!    the commit queue as soon as it is done. The scheduler applies it on
//!    the mutation context under the write lock, actions in order, then
//!    drops the faction's snapshot.
//!
//! A faction with a turn in flight is skipped for new turns. A failed or
//! panicked decide task leaves that faction's memory as of its last
//! commit and does not affect any other faction.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use armada_ai::{
    AiConfig, AiError, AiMemory, AiMemoryRecord, BattleContext, CommitSummary, Decision, FactionAi,
    StrategyChain, decide,
};
use armada_types::{Disposition, FactionId, UnitId, WorldSnapshot};
use armada_world::{AdvanceSummary, AssaultReport, Galaxy};
use chrono::NaiveDateTime;
use tokio::sync::{RwLock, Semaphore, mpsc};
use tokio::task::{AbortHandle, JoinSet};
use tokio::time::Interval;
use tracing::{debug, info, warn};

use crate::clock::{ClockError, WorldClock};
use crate::config::SchedulerConfig;
use crate::snapshot::{RadarSnapshots, SnapshotBuilder};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that stop the scheduler itself.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// The clock could not advance.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// No AI is registered for the faction.
    #[error("no AI registered for faction {0}")]
    UnknownFaction(FactionId),

    /// An AI is already registered for the faction.
    #[error("faction {0} already has an AI")]
    DuplicateFaction(FactionId),
}

/// Why a faction's turn produced no decision.
#[derive(Debug, thiserror::Error)]
pub enum DecisionError {
    /// A strategy gave up.
    #[error("strategy error: {source}")]
    Strategy {
        /// The underlying AI error.
        #[from]
        source: AiError,
    },

    /// The decide task panicked or was torn down.
    #[error("decide task failed: {reason}")]
    TaskFailed {
        /// Description from the task runtime.
        reason: String,
    },

    /// The worker pool was closed.
    #[error("worker pool closed")]
    WorkersClosed,
}

// ---------------------------------------------------------------------------
// Turn state
// ---------------------------------------------------------------------------

/// A finished decide task, waiting to be committed.
#[derive(Debug)]
pub struct TurnOutcome {
    /// Faction whose turn this is.
    pub faction: FactionId,
    /// Turn number the outcome belongs to.
    pub turn: u64,
    /// The decision, or why there is none.
    pub result: Result<Decision, DecisionError>,
}

/// Public view of where a faction is in its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Ready for a new turn.
    Idle,
    /// A decide task is in flight.
    Deciding {
        /// Turn number of the in-flight task.
        turn: u64,
    },
}

/// Internal phase of one faction slot.
enum TurnPhase {
    /// No turn in flight.
    Idle,
    /// Snapshot taken, decide task running.
    Deciding {
        /// Turn number of the in-flight task.
        turn: u64,
        /// Snapshot the task decides on; dropped at commit.
        snapshot: Arc<WorldSnapshot>,
        /// Handle for best-effort cancellation.
        task: AbortHandle,
    },
}

/// Everything the scheduler keeps per faction.
struct FactionSlot {
    /// The faction's AI and committed memory.
    ai: FactionAi,
    /// Strategy chain used for this faction.
    chain: Arc<StrategyChain>,
    /// Current turn phase.
    phase: TurnPhase,
    /// Assault reports that arrived while a turn was in flight.
    pending_observations: Vec<AssaultReport>,
}

/// Result of committing one faction's turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    /// Faction whose turn was committed.
    pub faction: FactionId,
    /// Turn number.
    pub turn: u64,
    /// Strategy that produced the actions, if any.
    pub strategy: Option<&'static str>,
    /// Per-action counts.
    pub summary: CommitSummary,
    /// Whether the decide step failed and nothing was applied.
    pub failed: bool,
}

/// What happened during one [`TurnScheduler::on_tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// Tick number after advancing.
    pub tick: u64,
    /// Game date of the tick.
    pub now: NaiveDateTime,
    /// Galaxy events from the economic advance.
    pub advance: AdvanceSummary,
    /// Commits that were ready at the start of the tick.
    pub commits: Vec<CommitReport>,
    /// Factions that started a new turn.
    pub started: Vec<FactionId>,
    /// Factions skipped because a turn was still in flight.
    pub busy: Vec<FactionId>,
    /// Whether the snapshot barrier timed out and the tick was abandoned.
    pub abandoned: bool,
}

/// What the run loop should handle next.
#[derive(Debug)]
pub enum SchedulerEvent {
    /// A decide task finished.
    Commit(TurnOutcome),
    /// The tick interval elapsed.
    Tick,
}

// ---------------------------------------------------------------------------
// TurnScheduler
// ---------------------------------------------------------------------------

/// Drives turns for all AI factions over a shared galaxy.
pub struct TurnScheduler {
    /// The authoritative galaxy.
    world: Arc<RwLock<Galaxy>>,
    /// Tick counter and calendar.
    clock: WorldClock,
    /// Per-faction AI slots.
    slots: BTreeMap<FactionId, FactionSlot>,
    /// Bounds concurrent snapshot and decide work.
    workers: Arc<Semaphore>,
    /// Snapshot construction strategy.
    snapshots: Arc<dyn SnapshotBuilder>,
    /// Strategy tunables shared by every faction.
    ai_config: Arc<AiConfig>,
    /// Barrier wait bound for the prepare phase.
    snapshot_timeout: Duration,
    /// Sender cloned into decide tasks.
    commit_tx: mpsc::UnboundedSender<TurnOutcome>,
    /// Commit queue drained on the mutation context.
    commit_rx: mpsc::UnboundedReceiver<TurnOutcome>,
    /// Last turn number handed out.
    last_turn: u64,
}

impl TurnScheduler {
    /// Create a scheduler with no factions registered.
    pub fn new(
        galaxy: Galaxy,
        clock: WorldClock,
        config: &SchedulerConfig,
        ai_config: AiConfig,
    ) -> Self {
        let (commit_tx, commit_rx) = mpsc::unbounded_channel();
        Self {
            world: Arc::new(RwLock::new(galaxy)),
            clock,
            slots: BTreeMap::new(),
            workers: Arc::new(Semaphore::new(config.worker_count())),
            snapshots: Arc::new(RadarSnapshots),
            ai_config: Arc::new(ai_config),
            snapshot_timeout: Duration::from_millis(config.snapshot_timeout_ms),
            commit_tx,
            commit_rx,
            last_turn: 0,
        }
    }

    /// Create a scheduler and register every AI-controlled faction of the
    /// galaxy with fresh memory and the standard chain.
    pub fn from_galaxy(
        galaxy: Galaxy,
        clock: WorldClock,
        config: &SchedulerConfig,
        ai_config: AiConfig,
    ) -> Self {
        let cell_size = ai_config.exploration_cell_size;
        let players: Vec<FactionAi> = galaxy
            .factions()
            .filter(|f| f.ai_controlled)
            .map(|f| FactionAi::new(f.id, f.traits, AiMemory::new(cell_size)))
            .collect();
        let mut scheduler = Self::new(galaxy, clock, config, ai_config);
        let chain = Arc::new(StrategyChain::standard());
        for ai in players {
            scheduler.insert_slot(ai, Arc::clone(&chain));
        }
        scheduler
    }

    /// Replace the snapshot construction strategy.
    #[must_use]
    pub fn with_snapshot_builder(mut self, builder: Arc<dyn SnapshotBuilder>) -> Self {
        self.snapshots = builder;
        self
    }

    /// Register a faction AI using the standard strategy chain.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::DuplicateFaction`] if already registered.
    pub fn add_faction(&mut self, ai: FactionAi) -> Result<(), SchedulerError> {
        self.add_faction_with_chain(ai, Arc::new(StrategyChain::standard()))
    }

    /// Register a faction AI with its own strategy chain.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::DuplicateFaction`] if already registered.
    pub fn add_faction_with_chain(
        &mut self,
        ai: FactionAi,
        chain: Arc<StrategyChain>,
    ) -> Result<(), SchedulerError> {
        if self.slots.contains_key(&ai.faction) {
            return Err(SchedulerError::DuplicateFaction(ai.faction));
        }
        self.insert_slot(ai, chain);
        Ok(())
    }

    fn insert_slot(&mut self, ai: FactionAi, chain: Arc<StrategyChain>) {
        info!(faction = %ai.faction, strategies = ?chain.names(), "Faction AI registered");
        self.slots.insert(
            ai.faction,
            FactionSlot {
                ai,
                chain,
                phase: TurnPhase::Idle,
                pending_observations: Vec::new(),
            },
        );
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Shared handle to the galaxy.
    pub fn world(&self) -> Arc<RwLock<Galaxy>> {
        Arc::clone(&self.world)
    }

    /// The world clock.
    pub const fn clock(&self) -> &WorldClock {
        &self.clock
    }

    /// Registered factions in ID order.
    pub fn factions(&self) -> Vec<FactionId> {
        self.slots.keys().copied().collect()
    }

    /// Turn state of a faction.
    pub fn turn_state(&self, faction: FactionId) -> Option<TurnState> {
        self.slots.get(&faction).map(|slot| match &slot.phase {
            TurnPhase::Idle => TurnState::Idle,
            TurnPhase::Deciding { turn, .. } => TurnState::Deciding { turn: *turn },
        })
    }

    /// Snapshot held for a faction's in-flight turn.
    pub fn snapshot_of(&self, faction: FactionId) -> Option<Arc<WorldSnapshot>> {
        match &self.slots.get(&faction)?.phase {
            TurnPhase::Deciding { snapshot, .. } => Some(Arc::clone(snapshot)),
            TurnPhase::Idle => None,
        }
    }

    /// Last committed memory of a faction.
    pub fn memory_of(&self, faction: FactionId) -> Option<&AiMemory> {
        self.slots.get(&faction).map(|slot| &slot.ai.memory)
    }

    /// Number of factions with a turn in flight.
    pub fn in_flight(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot.phase, TurnPhase::Deciding { .. }))
            .count()
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Run one simulation tick.
    ///
    /// Commits whatever is already finished, advances the galaxy and the
    /// clock, then starts turns for every idle faction.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Clock`] if the clock cannot advance.
    pub async fn on_tick(&mut self) -> Result<TickReport, SchedulerError> {
        let commits = self.drain_ready().await;

        let tick = self.clock.advance()?;
        let now = self.clock.now()?;
        let advance = self.world.write().await.advance();
        for report in &advance.assaults {
            self.observe_assault(report);
        }

        let mut eligible = Vec::new();
        let mut busy = Vec::new();
        for (id, slot) in &self.slots {
            match slot.phase {
                TurnPhase::Idle => eligible.push(*id),
                TurnPhase::Deciding { .. } => busy.push(*id),
            }
        }

        let mut report = TickReport {
            tick,
            now,
            advance,
            commits,
            started: Vec::new(),
            busy,
            abandoned: false,
        };
        if !report.busy.is_empty() {
            debug!(tick, busy = report.busy.len(), "Factions still mid-turn");
        }
        if eligible.is_empty() {
            return Ok(report);
        }

        let Some(prepared) = self.prepare(&eligible, tick, now).await else {
            warn!(
                tick,
                timeout_ms = self.snapshot_timeout.as_millis(),
                "Snapshot barrier timed out, abandoning tick"
            );
            report.abandoned = true;
            return Ok(report);
        };

        for (faction, snapshot, memory) in prepared {
            if self.start_decide(faction, snapshot, memory) {
                report.started.push(faction);
            }
        }
        debug!(tick, started = report.started.len(), "Turns started");
        Ok(report)
    }

    /// Phase 1: build snapshots for `eligible` in parallel and wait for
    /// all of them. Returns `None` if the barrier timed out.
    async fn prepare(
        &self,
        eligible: &[FactionId],
        tick: u64,
        now: NaiveDateTime,
    ) -> Option<Vec<(FactionId, WorldSnapshot, AiMemory)>> {
        let mut tasks = JoinSet::new();
        for &faction in eligible {
            let Some(slot) = self.slots.get(&faction) else {
                continue;
            };
            let memory = slot.ai.memory.clone();
            let world = Arc::clone(&self.world);
            let builder = Arc::clone(&self.snapshots);
            let workers = Arc::clone(&self.workers);
            tasks.spawn(async move {
                let Ok(permit) = workers.acquire_owned().await else {
                    return (faction, None);
                };
                let built = tokio::task::spawn_blocking(move || {
                    let galaxy = world.blocking_read();
                    builder
                        .build(&galaxy, faction, &memory, tick, now)
                        .map(|snapshot| (snapshot, memory))
                })
                .await;
                drop(permit);
                match built {
                    Ok(Ok(ready)) => (faction, Some(ready)),
                    Ok(Err(e)) => {
                        warn!(faction = %faction, error = %e, "Snapshot failed");
                        (faction, None)
                    }
                    Err(e) => {
                        warn!(faction = %faction, error = %e, "Snapshot task failed");
                        (faction, None)
                    }
                }
            });
        }

        let barrier = async {
            let mut prepared = Vec::with_capacity(eligible.len());
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((faction, Some((snapshot, memory)))) => {
                        prepared.push((faction, snapshot, memory));
                    }
                    Ok((_, None)) => {}
                    Err(e) => warn!(error = %e, "Snapshot task failed"),
                }
            }
            prepared
        };

        let waited = tokio::time::timeout(self.snapshot_timeout, barrier).await;
        match waited {
            Ok(prepared) => Some(prepared),
            Err(_elapsed) => {
                tasks.abort_all();
                None
            }
        }
    }

    /// Phase 2: spawn the decide task for one faction.
    fn start_decide(&mut self, faction: FactionId, snapshot: WorldSnapshot, memory: AiMemory) -> bool {
        let turn = self.last_turn.saturating_add(1);
        let Some(slot) = self.slots.get_mut(&faction) else {
            return false;
        };
        self.last_turn = turn;

        let snapshot = Arc::new(snapshot);
        let job = DecideJob {
            faction,
            turn,
            snapshot: Arc::clone(&snapshot),
            memory,
            chain: Arc::clone(&slot.chain),
            config: Arc::clone(&self.ai_config),
            workers: Arc::clone(&self.workers),
            commits: self.commit_tx.clone(),
        };
        let task = tokio::spawn(job.run());
        slot.phase = TurnPhase::Deciding {
            turn,
            snapshot,
            task: task.abort_handle(),
        };
        true
    }

    // -----------------------------------------------------------------------
    // Commit
    // -----------------------------------------------------------------------

    /// Phase 3: apply a finished turn on the mutation context.
    ///
    /// Outcomes of cancelled or superseded turns are discarded. Returns
    /// `None` for a discarded outcome.
    pub async fn commit(&mut self, outcome: TurnOutcome) -> Option<CommitReport> {
        let TurnOutcome {
            faction,
            turn,
            result,
        } = outcome;
        let Some(slot) = self.slots.get_mut(&faction) else {
            debug!(faction = %faction, "Outcome for unregistered faction");
            return None;
        };
        if !matches!(slot.phase, TurnPhase::Deciding { turn: current, .. } if current == turn) {
            debug!(faction = %faction, turn, "Discarding outcome of a cancelled turn");
            return None;
        }
        slot.phase = TurnPhase::Idle;

        let report = match result {
            Ok(decision) => {
                let strategy = decision.strategy;
                let summary = {
                    let mut galaxy = self.world.write().await;
                    slot.ai.commit(&mut galaxy, decision)
                };
                debug!(
                    faction = %faction,
                    turn,
                    strategy = strategy.unwrap_or("none"),
                    applied = summary.applied,
                    stale = summary.stale,
                    rejected = summary.rejected,
                    "Turn committed"
                );
                CommitReport {
                    faction,
                    turn,
                    strategy,
                    summary,
                    failed: false,
                }
            }
            Err(e) => {
                warn!(faction = %faction, turn, error = %e, "Turn failed, faction skips this tick");
                CommitReport {
                    faction,
                    turn,
                    strategy: None,
                    summary: CommitSummary::default(),
                    failed: true,
                }
            }
        };

        let weight = self.ai_config.opponent_smoothing;
        for observed in std::mem::take(&mut slot.pending_observations) {
            slot.ai.observe_assault(&observed, weight);
        }
        Some(report)
    }

    /// Commit every outcome already waiting in the queue.
    async fn drain_ready(&mut self) -> Vec<CommitReport> {
        let mut reports = Vec::new();
        while let Ok(outcome) = self.commit_rx.try_recv() {
            if let Some(report) = self.commit(outcome).await {
                reports.push(report);
            }
        }
        reports
    }

    /// Wait for and commit every in-flight turn.
    pub async fn settle(&mut self) -> Vec<CommitReport> {
        let mut reports = Vec::new();
        while self.in_flight() > 0 {
            let Some(outcome) = self.commit_rx.recv().await else {
                break;
            };
            if let Some(report) = self.commit(outcome).await {
                reports.push(report);
            }
        }
        reports
    }

    /// Wait for the next commit or the next tick, commits first.
    pub async fn next_event(&mut self, interval: &mut Interval) -> SchedulerEvent {
        tokio::select! {
            biased;
            Some(outcome) = self.commit_rx.recv() => SchedulerEvent::Commit(outcome),
            _ = interval.tick() => SchedulerEvent::Tick,
        }
    }

    /// Abort every in-flight turn. Memory stays as of the last commit.
    ///
    /// Returns the number of turns cancelled.
    pub fn cancel_outstanding(&mut self) -> usize {
        let mut cancelled = 0_usize;
        for (faction, slot) in &mut self.slots {
            if let TurnPhase::Deciding { turn, task, .. } = &slot.phase {
                task.abort();
                debug!(faction = %faction, turn, "Turn cancelled");
                cancelled = cancelled.saturating_add(1);
            }
            slot.phase = TurnPhase::Idle;
        }
        if cancelled > 0 {
            info!(cancelled, "Outstanding turns cancelled");
        }
        cancelled
    }

    // -----------------------------------------------------------------------
    // Observations, battles, persistence
    // -----------------------------------------------------------------------

    /// Feed an assault to the factions involved. Factions mid-turn learn
    /// it after their commit so the decide task's memory does not
    /// overwrite it.
    fn observe_assault(&mut self, report: &AssaultReport) {
        let weight = self.ai_config.opponent_smoothing;
        for faction in [report.attacker, report.defender] {
            let Some(slot) = self.slots.get_mut(&faction) else {
                continue;
            };
            match slot.phase {
                TurnPhase::Idle => slot.ai.observe_assault(report, weight),
                TurnPhase::Deciding { .. } => slot.pending_observations.push(*report),
            }
        }
    }

    /// Let a faction's AI assign targets for one battle tick.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::UnknownFaction`] if no AI is registered.
    pub fn on_battle_tick<B: BattleContext + ?Sized>(
        &self,
        faction: FactionId,
        battle: &mut B,
        idle: &[UnitId],
    ) -> Result<Disposition, SchedulerError> {
        let slot = self
            .slots
            .get(&faction)
            .ok_or(SchedulerError::UnknownFaction(faction))?;
        Ok(slot.ai.on_battle_tick(battle, idle))
    }

    /// Capture every faction's committed memory.
    pub fn save_ai(&self) -> BTreeMap<FactionId, AiMemoryRecord> {
        self.slots
            .iter()
            .map(|(id, slot)| (*id, slot.ai.memory.to_record()))
            .collect()
    }

    /// Restore memory for registered factions. Records for unknown
    /// factions are skipped. Returns the number restored.
    pub fn load_ai(&mut self, records: &BTreeMap<FactionId, AiMemoryRecord>) -> usize {
        let cell_size = self.ai_config.exploration_cell_size;
        let mut restored = 0_usize;
        for (faction, record) in records {
            match self.slots.get_mut(faction) {
                Some(slot) => {
                    slot.ai.memory = AiMemory::from_record(record, cell_size);
                    restored = restored.saturating_add(1);
                }
                None => warn!(faction = %faction, "Skipping AI record for unknown faction"),
            }
        }
        restored
    }
}

/// Everything one faction's decide task owns.
struct DecideJob {
    faction: FactionId,
    turn: u64,
    snapshot: Arc<WorldSnapshot>,
    memory: AiMemory,
    chain: Arc<StrategyChain>,
    config: Arc<AiConfig>,
    workers: Arc<Semaphore>,
    commits: mpsc::UnboundedSender<TurnOutcome>,
}

impl DecideJob {
    /// Decide on a blocking worker and post the outcome.
    async fn run(self) {
        let Self {
            faction,
            turn,
            snapshot,
            memory,
            chain,
            config,
            workers,
            commits,
        } = self;

        let result = match workers.acquire_owned().await {
            Ok(permit) => {
                let joined = tokio::task::spawn_blocking(move || {
                    decide(faction, &snapshot, memory, &chain, &config)
                })
                .await;
                drop(permit);
                match joined {
                    Ok(decided) => decided.map_err(DecisionError::from),
                    Err(e) => Err(DecisionError::TaskFailed {
                        reason: e.to_string(),
                    }),
                }
            }
            Err(_closed) => Err(DecisionError::WorkersClosed),
        };

        let outcome = TurnOutcome {
            faction,
            turn,
            result,
        };
        if commits.send(outcome).is_err() {
            debug!(faction = %faction, turn, "Scheduler gone, dropping outcome");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use armada_ai::SpaceBattle;
    use armada_world::{EconomyRules, create_starting_galaxy};
    use chrono::NaiveDate;

    use super::*;

    fn scheduler() -> (TurnScheduler, armada_world::StartingFactions) {
        let (galaxy, factions) = create_starting_galaxy(21, EconomyRules::default()).unwrap();
        let start = NaiveDate::from_ymd_opt(3000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let clock = WorldClock::new(start, 6).unwrap();
        let scheduler = TurnScheduler::from_galaxy(
            galaxy,
            clock,
            &SchedulerConfig::default(),
            AiConfig::default(),
        );
        (scheduler, factions)
    }

    #[test]
    fn registers_every_ai_faction_idle() {
        let (scheduler, factions) = scheduler();
        assert_eq!(scheduler.factions().len(), 3);
        assert_eq!(scheduler.turn_state(factions.vega), Some(TurnState::Idle));
        assert_eq!(scheduler.in_flight(), 0);
        assert_eq!(scheduler.turn_state(FactionId::new()), None);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let (mut scheduler, factions) = scheduler();
        let ai = FactionAi::new(
            factions.rigel,
            armada_types::FactionTraits::default(),
            AiMemory::new(25.0),
        );
        assert!(matches!(
            scheduler.add_faction(ai),
            Err(SchedulerError::DuplicateFaction(id)) if id == factions.rigel
        ));
    }

    #[tokio::test]
    async fn outcome_without_turn_in_flight_is_discarded() {
        let (mut scheduler, factions) = scheduler();
        let before = scheduler.memory_of(factions.vega).cloned();
        let outcome = TurnOutcome {
            faction: factions.vega,
            turn: 99,
            result: Ok(Decision {
                strategy: Some("colonization"),
                actions: Vec::new(),
                memory: AiMemory::new(1.0),
            }),
        };

        assert!(scheduler.commit(outcome).await.is_none());
        assert_eq!(scheduler.memory_of(factions.vega).cloned(), before);
    }

    #[test]
    fn battle_tick_for_unknown_faction_fails() {
        let (scheduler, _) = scheduler();
        let mut battle = SpaceBattle::new(10.0, 1);
        let stranger = FactionId::new();
        assert!(matches!(
            scheduler.on_battle_tick(stranger, &mut battle, &[]),
            Err(SchedulerError::UnknownFaction(id)) if id == stranger
        ));
    }

    #[test]
    fn load_skips_unknown_factions() {
        let (mut scheduler, factions) = scheduler();
        let mut records = BTreeMap::new();
        records.insert(
            factions.altair,
            AiMemoryRecord {
                exploration: "1;1 2;2".to_owned(),
                ..AiMemoryRecord::default()
            },
        );
        records.insert(FactionId::new(), AiMemoryRecord::default());

        assert_eq!(scheduler.load_ai(&records), 1);
        let memory = scheduler.memory_of(factions.altair).unwrap();
        assert_eq!(memory.exploration.len(), 2);
    }

    #[test]
    fn cancel_with_nothing_in_flight_is_a_no_op() {
        let (mut scheduler, _) = scheduler();
        assert_eq!(scheduler.cancel_outstanding(), 0);
    }
}
