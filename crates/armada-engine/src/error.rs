//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode of startup, the run loop and
//! the closing save so `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: armada_core::config::ConfigError,
    },

    /// World clock initialization failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: armada_core::clock::ClockError,
    },

    /// Starting galaxy construction failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: armada_world::WorldError,
    },

    /// The scheduler rejected a request.
    #[error("scheduler error: {source}")]
    Scheduler {
        /// The underlying scheduler error.
        #[from]
        source: armada_core::scheduler::SchedulerError,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: armada_core::runner::RunnerError,
    },

    /// Writing the AI save block failed.
    #[error("save error: {source}")]
    Save {
        /// The underlying save error.
        #[from]
        source: armada_core::save::SaveError,
    },
}
