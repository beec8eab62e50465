//! World clock, turn scheduling and orchestration for the Armada simulation.
//!
//! This crate owns the concurrent turn cycle that drives every AI faction:
//! snapshot under a shared read lock, decide on worker threads, commit on
//! the single mutation context.
//!
//! # Modules
//!
//! - [`clock`] -- World clock with tick counter and game calendar.
//! - [`config`] -- Configuration loading from `armada-config.yaml` into
//!   strongly-typed structs.
//! - [`snapshot`] -- [`SnapshotBuilder`] trait and radar-limited snapshots.
//! - [`scheduler`] -- [`TurnScheduler`], the snapshot/decide/commit cycle.
//! - [`operator`] -- Pause, resume, tick speed and stop controls.
//! - [`runner`] -- The fixed-period run loop.
//! - [`skirmish`] -- Battles between two factions driven by their AIs.
//! - [`save`] -- AI save block I/O.
//!
//! [`SnapshotBuilder`]: snapshot::SnapshotBuilder
//! [`TurnScheduler`]: scheduler::TurnScheduler

pub mod clock;
pub mod config;
pub mod operator;
pub mod runner;
pub mod save;
pub mod scheduler;
pub mod skirmish;
pub mod snapshot;
