//! Save and load of [`AiMemory`] through a serde-friendly record.
//!
//! The on-disk shape is an [`AiMemoryRecord`]:
//!
//! - `defensive_fleets`: fleet IDs as strings
//! - `cell_size`: side length of the exploration grid the cells refer to
//! - `exploration`: explored cells as whitespace-separated `x;y` tokens
//! - `attack`: optional `YYYY-MM-DDTHH:MM:SS` date of the next offensive
//! - `opponents`: learned rival strength
//!
//! Loading is tolerant. Missing fields fall back to empty values, and a
//! malformed token or date is skipped with a warning instead of failing
//! the whole load.

use armada_types::{FactionId, FleetId, GridCell};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::memory::{AiMemory, OpponentStrength};

/// Format of persisted game dates.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Persisted estimate of one rival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentRecord {
    /// Rival faction ID.
    pub faction: String,
    /// Estimated assault attack.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack: Option<f64>,
    /// Estimated planet defense.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defense: Option<f64>,
}

/// Serialized form of one faction's AI memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiMemoryRecord {
    /// Fleets reserved for defense.
    #[serde(default)]
    pub defensive_fleets: Vec<String>,
    /// Grid cell size the explored cells were recorded with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_size: Option<f64>,
    /// Explored cells as `x;y` tokens separated by spaces.
    #[serde(default)]
    pub exploration: String,
    /// Date of the next scheduled offensive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack: Option<String>,
    /// Learned rival strength.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub opponents: Vec<OpponentRecord>,
}

impl AiMemory {
    /// Capture this memory as a persistable record.
    pub fn to_record(&self) -> AiMemoryRecord {
        AiMemoryRecord {
            defensive_fleets: self
                .defensive_fleets
                .iter()
                .map(ToString::to_string)
                .collect(),
            cell_size: Some(self.exploration.cell_size()),
            exploration: self
                .exploration
                .cells()
                .map(|cell| cell.to_string())
                .collect::<Vec<_>>()
                .join(" "),
            attack: self
                .next_attack_time
                .map(|at| at.format(DATE_FORMAT).to_string()),
            opponents: self
                .opponent_strength
                .iter()
                .map(|(faction, strength)| OpponentRecord {
                    faction: faction.to_string(),
                    attack: strength.attack,
                    defense: strength.defense,
                })
                .collect(),
        }
    }

    /// Rebuild memory from a record, skipping anything malformed.
    ///
    /// Explored cells keep the grid they were saved with. `cell_size` only
    /// applies to records that carry no usable size of their own.
    pub fn from_record(record: &AiMemoryRecord, cell_size: f64) -> Self {
        let saved_size = record
            .cell_size
            .filter(|size| size.is_finite() && *size > 0.0);
        if saved_size.is_some_and(|saved| (saved - cell_size).abs() > f64::EPSILON) {
            debug!(saved = ?saved_size, configured = cell_size, "Keeping saved exploration cell size");
        }
        let mut memory = Self::new(saved_size.unwrap_or(cell_size));

        for raw in &record.defensive_fleets {
            match raw.parse::<FleetId>() {
                Ok(fleet) => {
                    memory.defensive_fleets.insert(fleet);
                }
                Err(e) => warn!(value = %raw, error = %e, "Skipping malformed defensive fleet ID"),
            }
        }

        for token in record.exploration.split_whitespace() {
            match token.parse::<GridCell>() {
                Ok(cell) => {
                    memory.exploration.insert(cell);
                }
                Err(e) => warn!(error = %e, "Skipping malformed exploration cell"),
            }
        }

        if let Some(raw) = &record.attack {
            match NaiveDateTime::parse_from_str(raw, DATE_FORMAT) {
                Ok(at) => memory.next_attack_time = Some(at),
                Err(e) => warn!(value = %raw, error = %e, "Skipping malformed attack date"),
            }
        }

        for opponent in &record.opponents {
            match opponent.faction.parse::<FactionId>() {
                Ok(faction) => {
                    memory.opponent_strength.insert(
                        faction,
                        OpponentStrength {
                            attack: opponent.attack.filter(|v| v.is_finite()),
                            defense: opponent.defense.filter(|v| v.is_finite()),
                        },
                    );
                }
                Err(e) => warn!(
                    value = %opponent.faction,
                    error = %e,
                    "Skipping opponent with malformed faction ID"
                ),
            }
        }

        memory
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use armada_types::{GalaxyBounds, Position};
    use chrono::NaiveDate;

    use super::*;

    fn sample_memory() -> AiMemory {
        let mut memory = AiMemory::new(25.0);
        memory.set_defensive(FleetId::new(), true);
        memory.exploration.insert(GridCell::new(1, 2));
        memory.exploration.insert(GridCell::new(-4, 7));
        memory.next_attack_time = NaiveDate::from_ymd_opt(3012, 4, 9)
            .unwrap()
            .and_hms_opt(6, 0, 0);
        memory.observe_attack(FactionId::new(), 18.0, 0.3);
        memory
    }

    #[test]
    fn record_reproduces_memory() {
        let memory = sample_memory();
        let json = serde_json::to_string(&memory.to_record()).unwrap();
        let record: AiMemoryRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(AiMemory::from_record(&record, 25.0), memory);
    }

    #[test]
    fn smoothed_estimates_survive_json_exactly() {
        let mut memory = AiMemory::new(25.0);
        let rival = FactionId::new();
        let mut observed = 40.0_f64;
        for _ in 0..200 {
            memory.observe_defense(rival, observed, 0.3);
            memory.observe_attack(rival, observed / 3.0, 0.3);
            observed = (observed * 1.37) % 97.0 + 0.1;
        }
        memory.observe_defense(rival, 40.0, 0.3);
        memory.observe_defense(rival, 27.5, 0.3);

        let json = serde_json::to_string(&memory.to_record()).unwrap();
        let record: AiMemoryRecord = serde_json::from_str(&json).unwrap();
        let loaded = AiMemory::from_record(&record, 25.0);
        assert_eq!(
            loaded.opponent_strength[&rival],
            memory.opponent_strength[&rival]
        );
    }

    #[test]
    fn explored_cells_keep_their_saved_grid() {
        let mut memory = AiMemory::new(10.0);
        memory.exploration.reveal(
            Position::new(55.0, 55.0),
            0.0,
            GalaxyBounds {
                width: 100.0,
                height: 100.0,
            },
        );
        let record = memory.to_record();
        assert_eq!(record.cell_size, Some(10.0));

        let loaded = AiMemory::from_record(&record, 40.0);
        assert_eq!(loaded.exploration.cell_size(), 10.0);
        assert!(loaded.exploration.is_explored(Position::new(51.0, 59.0)));
        assert!(!loaded.exploration.is_explored(Position::new(45.0, 55.0)));
    }

    #[test]
    fn records_without_cell_size_use_the_configured_one() {
        let record = AiMemoryRecord {
            exploration: "1;1".to_owned(),
            ..AiMemoryRecord::default()
        };
        let loaded = AiMemory::from_record(&record, 40.0);
        assert_eq!(loaded.exploration.cell_size(), 40.0);
        assert!(loaded.exploration.is_explored(Position::new(41.0, 79.0)));
    }

    #[test]
    fn attack_date_uses_fixed_format() {
        let record = sample_memory().to_record();
        assert_eq!(record.attack.as_deref(), Some("3012-04-09T06:00:00"));
    }

    #[test]
    fn missing_fields_load_as_empty() {
        let record: AiMemoryRecord = serde_json::from_str("{}").unwrap();
        let memory = AiMemory::from_record(&record, 25.0);
        assert!(memory.defensive_fleets.is_empty());
        assert!(memory.exploration.is_empty());
        assert!(memory.next_attack_time.is_none());
        assert!(memory.opponent_strength.is_empty());
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let good_fleet = FleetId::new();
        let record = AiMemoryRecord {
            defensive_fleets: vec!["not-a-uuid".to_owned(), good_fleet.to_string()],
            cell_size: Some(-3.0),
            exploration: "1;1 garbage 2; 3;4".to_owned(),
            attack: Some("next tuesday".to_owned()),
            opponents: vec![OpponentRecord {
                faction: "???".to_owned(),
                attack: Some(1.0),
                defense: None,
            }],
        };
        let memory = AiMemory::from_record(&record, 25.0);
        assert_eq!(memory.defensive_fleets.len(), 1);
        assert!(memory.is_defensive(good_fleet));
        assert_eq!(
            memory.exploration.cells().collect::<Vec<_>>(),
            vec![GridCell::new(1, 1), GridCell::new(3, 4)]
        );
        assert!(memory.next_attack_time.is_none());
        assert!(memory.opponent_strength.is_empty());
    }
}
