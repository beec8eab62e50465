//! Operator controls for the run loop.
//!
//! The operator can pause and resume, change the tick period and request
//! a clean stop without tearing down the process. Pausing cancels every
//! outstanding faction turn, the same way a battle start does; the
//! cancelled factions get a fresh turn after resume.
//!
//! The run state is a single atomic so the loop reads it on every
//! iteration without a lock. A stop overrides a pause.

use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify};

use crate::config::SimulationConfig;

/// Smallest tick period the operator may set.
pub const MIN_TICK_INTERVAL_MS: u64 = 10;

const RUNNING: u8 = 0;
const PAUSED: u8 = 1;
const STOPPING: u8 = 2;

/// Reason why the simulation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationEndReason {
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// An operator issued a stop command.
    OperatorStop,
}

/// What the run loop should be doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// Ticking normally.
    Running,
    /// Parked until resumed.
    Paused,
    /// Winding down.
    Stopping,
}

impl RunState {
    const fn from_raw(raw: u8) -> Self {
        match raw {
            RUNNING => Self::Running,
            PAUSED => Self::Paused,
            _ => Self::Stopping,
        }
    }
}

/// Shared operator control state.
#[derive(Debug)]
pub struct OperatorState {
    /// Current [`RunState`] in raw form.
    state: AtomicU8,
    /// Wakes a parked run loop.
    wake: Notify,
    /// Current tick period in milliseconds.
    tick_interval_ms: AtomicU64,
    /// Wall-clock time the simulation started.
    started_at: DateTime<Utc>,
    /// Maximum number of ticks (0 = unlimited).
    max_ticks: u64,
    /// Why the simulation ended, once it has.
    end_reason: Mutex<Option<SimulationEndReason>>,
}

impl OperatorState {
    /// Create operator state from configuration.
    pub fn new(tick_interval_ms: u64, simulation: &SimulationConfig) -> Self {
        Self {
            state: AtomicU8::new(RUNNING),
            wake: Notify::new(),
            tick_interval_ms: AtomicU64::new(tick_interval_ms.max(MIN_TICK_INTERVAL_MS)),
            started_at: Utc::now(),
            max_ticks: simulation.max_ticks,
            end_reason: Mutex::new(None),
        }
    }

    /// Current run state.
    pub fn run_state(&self) -> RunState {
        RunState::from_raw(self.state.load(Ordering::Acquire))
    }

    // -----------------------------------------------------------------------
    // Pause / Resume / Stop
    // -----------------------------------------------------------------------

    /// Whether the loop should park.
    pub fn is_paused(&self) -> bool {
        self.run_state() == RunState::Paused
    }

    /// Whether the loop should wind down.
    pub fn is_stop_requested(&self) -> bool {
        self.run_state() == RunState::Stopping
    }

    /// Pause a running simulation. Returns `false` if it was not running.
    pub fn pause(&self) -> bool {
        self.state
            .compare_exchange(RUNNING, PAUSED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Resume a paused simulation. Returns `false` if it was not paused.
    pub fn resume(&self) -> bool {
        let resumed = self
            .state
            .compare_exchange(PAUSED, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if resumed {
            self.wake.notify_one();
        }
        resumed
    }

    /// Request a clean stop, waking a parked loop.
    pub fn request_stop(&self) {
        self.state.store(STOPPING, Ordering::Release);
        self.wake.notify_one();
    }

    /// Park until resumed or stopped. Returns at once when running.
    pub async fn wait_if_paused(&self) {
        while self.is_paused() {
            self.wake.notified().await;
        }
    }

    /// Record why the simulation ended.
    pub async fn set_end_reason(&self, reason: SimulationEndReason) {
        *self.end_reason.lock().await = Some(reason);
    }

    /// Why the simulation ended, if it has.
    pub async fn end_reason(&self) -> Option<SimulationEndReason> {
        *self.end_reason.lock().await
    }

    // -----------------------------------------------------------------------
    // Pacing and bounds
    // -----------------------------------------------------------------------

    /// Current tick period in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Acquire)
    }

    /// Change the tick period. Values below [`MIN_TICK_INTERVAL_MS`] are
    /// rejected with `None`; otherwise the previous period is returned.
    pub fn set_tick_interval_ms(&self, ms: u64) -> Option<u64> {
        (ms >= MIN_TICK_INTERVAL_MS).then(|| self.tick_interval_ms.swap(ms, Ordering::AcqRel))
    }

    /// Whether `tick` is at or past a non-zero `max_ticks`.
    pub const fn tick_limit_reached(&self, tick: u64) -> bool {
        self.max_ticks > 0 && tick >= self.max_ticks
    }

    /// Configured max ticks (0 = unlimited).
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// Wall-clock seconds since the operator state was created.
    pub fn elapsed_seconds(&self) -> u64 {
        let elapsed = Utc::now().signed_duration_since(self.started_at).num_seconds();
        u64::try_from(elapsed).unwrap_or(0)
    }
}
