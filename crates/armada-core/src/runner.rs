//! Simulation run loop with operator controls.
//!
//! [`run_simulation`] drives a [`TurnScheduler`] at a fixed period:
//!
//! - **Ticks**: every period the scheduler advances the galaxy and starts
//!   turns for idle factions.
//! - **Commits**: between ticks, finished turns are committed as soon as
//!   they arrive.
//! - **Pause/resume**: pausing cancels outstanding turns and parks the
//!   loop until resumed.
//! - **Variable tick speed**: the period is re-read after every tick.
//! - **Bounded runs**: stop after `max_ticks` or on operator request, then
//!   settle in-flight turns.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::operator::{OperatorState, SimulationEndReason};
use crate::scheduler::{CommitReport, SchedulerError, SchedulerEvent, TickReport, TurnScheduler};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The scheduler could not run a tick.
    #[error("scheduler error: {source}")]
    Scheduler {
        /// The underlying scheduler error.
        #[from]
        source: SchedulerError,
    },
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick report, if any tick completed.
    pub final_report: Option<TickReport>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
    /// Turns committed with a decision.
    pub committed_turns: u64,
    /// Turns whose decide step failed.
    pub failed_turns: u64,
    /// Ticks abandoned at the snapshot barrier.
    pub abandoned_ticks: u64,
}

/// Running totals kept by the loop.
#[derive(Debug, Default)]
struct Totals {
    ticks: u64,
    committed: u64,
    failed: u64,
    abandoned: u64,
}

impl Totals {
    const fn record_commit(&mut self, report: &CommitReport) {
        if report.failed {
            self.failed = self.failed.saturating_add(1);
        } else {
            self.committed = self.committed.saturating_add(1);
        }
    }

    fn record_tick(&mut self, report: &TickReport) {
        self.ticks = self.ticks.saturating_add(1);
        if report.abandoned {
            self.abandoned = self.abandoned.saturating_add(1);
        }
        for commit in &report.commits {
            self.record_commit(commit);
        }
    }
}

fn tick_interval(ms: u64) -> Interval {
    let mut interval = tokio::time::interval(Duration::from_millis(ms.max(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Run the simulation loop until a termination condition is met.
///
/// # Errors
///
/// Returns [`RunnerError`] if the scheduler fails unrecoverably.
pub async fn run_simulation(
    scheduler: &mut TurnScheduler,
    operator: &Arc<OperatorState>,
) -> Result<SimulationResult, RunnerError> {
    let mut totals = Totals::default();
    let mut last_report: Option<TickReport> = None;
    let mut period_ms = operator.tick_interval_ms();
    let mut interval = tick_interval(period_ms);

    info!(
        max_ticks = operator.max_ticks(),
        tick_interval_ms = period_ms,
        factions = scheduler.factions().len(),
        "Simulation starting"
    );

    let end_reason = loop {
        // --- Check pause ---
        if operator.is_paused() {
            let cancelled = scheduler.cancel_outstanding();
            info!(cancelled, "Simulation paused, waiting for resume");
            operator.wait_if_paused().await;
            info!("Simulation resumed");
            interval.reset();
        }

        // --- Check stop request ---
        if operator.is_stop_requested() {
            info!("Operator stop requested");
            break SimulationEndReason::OperatorStop;
        }

        match scheduler.next_event(&mut interval).await {
            SchedulerEvent::Commit(outcome) => {
                if let Some(report) = scheduler.commit(outcome).await {
                    totals.record_commit(&report);
                }
            }
            SchedulerEvent::Tick => {
                let report = scheduler.on_tick().await?;
                totals.record_tick(&report);
                debug!(
                    tick = report.tick,
                    started = report.started.len(),
                    busy = report.busy.len(),
                    "Tick complete"
                );

                let tick = report.tick;
                last_report = Some(report);
                if operator.tick_limit_reached(tick) {
                    info!(tick, max_ticks = operator.max_ticks(), "Tick limit reached");
                    break SimulationEndReason::MaxTicksReached;
                }

                // --- Apply tick speed changes ---
                let wanted = operator.tick_interval_ms();
                if wanted != period_ms {
                    info!(from = period_ms, to = wanted, "Tick interval changed");
                    period_ms = wanted;
                    interval = tick_interval(period_ms);
                }
            }
        }
    };

    for report in scheduler.settle().await {
        totals.record_commit(&report);
    }
    operator.set_end_reason(end_reason).await;

    Ok(SimulationResult {
        end_reason,
        final_report: last_report,
        total_ticks: totals.ticks,
        committed_turns: totals.committed,
        failed_turns: totals.failed,
        abandoned_ticks: totals.abandoned,
    })
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        committed_turns = result.committed_turns,
        failed_turns = result.failed_turns,
        abandoned_ticks = result.abandoned_ticks,
        "Simulation ended"
    );

    if let Some(ref report) = result.final_report {
        info!(
            tick = report.tick,
            date = %report.now,
            colonized = report.advance.colonized.len(),
            captured = report.advance.captured.len(),
            "Final tick"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use armada_ai::AiConfig;
    use armada_world::{EconomyRules, create_starting_galaxy};
    use chrono::NaiveDate;

    use super::*;
    use crate::clock::WorldClock;
    use crate::config::{SchedulerConfig, SimulationConfig};

    fn make_scheduler() -> TurnScheduler {
        let (galaxy, _) = create_starting_galaxy(7, EconomyRules::default()).unwrap();
        let start = NaiveDate::from_ymd_opt(3000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let clock = WorldClock::new(start, 6).unwrap();
        TurnScheduler::from_galaxy(
            galaxy,
            clock,
            &SchedulerConfig::default(),
            AiConfig::default(),
        )
    }

    fn operator(max_ticks: u64) -> Arc<OperatorState> {
        let simulation = SimulationConfig {
            max_ticks,
            ..SimulationConfig::default()
        };
        Arc::new(OperatorState::new(10, &simulation))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn bounded_by_max_ticks() {
        let mut scheduler = make_scheduler();
        let operator = operator(5);

        let result = run_simulation(&mut scheduler, &operator).await.unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(result.final_report.map(|r| r.tick), Some(5));
        assert_eq!(scheduler.in_flight(), 0);
        assert_eq!(
            operator.end_reason().await,
            Some(SimulationEndReason::MaxTicksReached)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn operator_stop_before_first_tick() {
        let mut scheduler = make_scheduler();
        let operator = operator(0);
        operator.request_stop();

        let result = run_simulation(&mut scheduler, &operator).await.unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::OperatorStop);
        assert_eq!(result.total_ticks, 0);
        assert!(result.final_report.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn turns_are_committed_during_the_run() {
        let mut scheduler = make_scheduler();
        let operator = operator(8);

        let result = run_simulation(&mut scheduler, &operator).await.unwrap();

        assert!(result.committed_turns > 0);
        assert_eq!(result.failed_turns, 0);
        assert_eq!(result.abandoned_ticks, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn paused_run_continues_after_resume() {
        let mut scheduler = make_scheduler();
        let operator = operator(3);
        assert!(operator.pause());
        let resumer = {
            let operator = Arc::clone(&operator);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                operator.resume()
            })
        };

        let result = run_simulation(&mut scheduler, &operator).await.unwrap();

        assert!(resumer.await.unwrap());
        assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 3);
    }
}
