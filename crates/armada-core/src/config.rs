//! Configuration loading and typed config structures for Armada.
//!
//! The canonical configuration lives in `armada-config.yaml` at the
//! project root. Every field has a default, so a partial file (or no file
//! at all) yields a runnable configuration.

use std::path::{Path, PathBuf};

use armada_ai::AiConfig;
use armada_world::EconomyRules;
use chrono::NaiveDateTime;
use serde::Deserialize;

/// Format of dates in the configuration file.
pub const CONFIG_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is not usable.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `armada-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ArmadaConfig {
    /// Galaxy seed, calendar and tick pacing.
    #[serde(default)]
    pub world: WorldConfig,

    /// Worker pool and snapshot barrier settings.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Strategy tunables.
    #[serde(default)]
    pub ai: AiConfig,

    /// Costs and unit parameters.
    #[serde(default)]
    pub economy: EconomyRules,

    /// Run bounds and save location.
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ArmadaConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Galaxy and calendar settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable game name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for the starting galaxy and battles.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Real-time milliseconds per tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Game date of tick 0, as `YYYY-MM-DDTHH:MM:SS`.
    #[serde(default = "default_start_date")]
    pub start_date: String,

    /// Game hours that pass per tick.
    #[serde(default = "default_hours_per_tick")]
    pub hours_per_tick: u32,
}

impl WorldConfig {
    /// Parse the configured start date.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the date is malformed.
    pub fn start(&self) -> Result<NaiveDateTime, ConfigError> {
        NaiveDateTime::parse_from_str(&self.start_date, CONFIG_DATE_FORMAT).map_err(|e| {
            ConfigError::Invalid {
                field: "world.start_date",
                reason: e.to_string(),
            }
        })
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            tick_interval_ms: default_tick_interval_ms(),
            start_date: default_start_date(),
            hours_per_tick: default_hours_per_tick(),
        }
    }
}

/// Concurrency settings for the turn scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum concurrent snapshot and decide tasks (0 = one per CPU).
    #[serde(default)]
    pub workers: usize,

    /// Milliseconds to wait for all snapshots before abandoning the tick.
    #[serde(default = "default_snapshot_timeout_ms")]
    pub snapshot_timeout_ms: u64,
}

impl SchedulerConfig {
    /// Resolved worker count, never zero.
    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            snapshot_timeout_ms: default_snapshot_timeout_ms(),
        }
    }
}

/// Run bounds and persistence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Stop after this many ticks (0 = unlimited).
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Where the AI save block is read from and written to.
    #[serde(default)]
    pub save_path: Option<PathBuf>,

    /// Rounds of the closing skirmish between the first two rivals
    /// (0 = no skirmish).
    #[serde(default = "default_skirmish_rounds")]
    pub skirmish_rounds: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
            save_path: None,
            skirmish_rounds: default_skirmish_rounds(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_world_name() -> String {
    "Armada".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_tick_interval_ms() -> u64 {
    250
}

fn default_start_date() -> String {
    "3000-01-01T00:00:00".to_owned()
}

const fn default_hours_per_tick() -> u32 {
    6
}

const fn default_snapshot_timeout_ms() -> u64 {
    2000
}

const fn default_max_ticks() -> u64 {
    200
}

const fn default_skirmish_rounds() -> u32 {
    20
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        let config = ArmadaConfig::parse("{}").unwrap();
        assert_eq!(config, ArmadaConfig::default());
        assert_eq!(config.world.hours_per_tick, 6);
        assert_eq!(config.scheduler.snapshot_timeout_ms, 2000);
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let yaml = r"
world:
  seed: 7
  start_date: '2999-12-31T18:00:00'
scheduler:
  workers: 3
ai:
  attack_delay_hours: 24
economy:
  colony_cost: 200
simulation:
  max_ticks: 10
  save_path: saves/ai.json
";
        let config = ArmadaConfig::parse(yaml).unwrap();
        assert_eq!(config.world.seed, 7);
        assert_eq!(config.world.tick_interval_ms, 250);
        assert_eq!(config.scheduler.worker_count(), 3);
        assert_eq!(config.ai.attack_delay_hours, 24);
        assert_eq!(config.ai.scouts_wanted, 1);
        assert_eq!(config.economy.colony_cost, 200);
        assert_eq!(config.simulation.max_ticks, 10);
        assert_eq!(
            config.simulation.save_path,
            Some(PathBuf::from("saves/ai.json"))
        );
        assert_eq!(
            config.world.start().unwrap().to_string(),
            "2999-12-31 18:00:00"
        );
    }

    #[test]
    fn malformed_start_date_is_reported() {
        let config = ArmadaConfig::parse("world:\n  start_date: yesterday\n").unwrap();
        assert!(matches!(
            config.world.start(),
            Err(ConfigError::Invalid { field: "world.start_date", .. })
        ));
    }

    #[test]
    fn worker_count_is_never_zero() {
        assert!(SchedulerConfig::default().worker_count() >= 1);
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(ArmadaConfig::parse("world: [unclosed").is_err());
    }

    #[test]
    fn shipped_config_parses() {
        let config = ArmadaConfig::parse(include_str!("../../../armada-config.yaml")).unwrap();
        assert_eq!(config.economy, EconomyRules::default());
        assert_eq!(config.ai, AiConfig::default());
        assert_eq!(config.world.start().unwrap().to_string(), "3000-01-01 00:00:00");
    }
}
