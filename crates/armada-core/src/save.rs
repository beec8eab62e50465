//! AI save block I/O.
//!
//! The AI block of a save file holds one [`AiMemoryRecord`] per faction,
//! keyed by faction ID, written as pretty JSON. Reading is tolerant: an
//! entry whose key is not a valid faction ID is skipped with a warning so
//! one bad entry never loses the rest of the block.

use std::collections::BTreeMap;
use std::path::Path;

use armada_ai::AiMemoryRecord;
use armada_types::FactionId;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Current layout version of the AI save block.
pub const SAVE_VERSION: u32 = 1;

/// Errors reading or writing the AI save block.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// Filesystem failure.
    #[error("save file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The block is not valid JSON of the expected shape.
    #[error("save file format error: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk shape of the AI save block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct AiSaveBlock {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    factions: BTreeMap<String, AiMemoryRecord>,
}

/// Render the AI save block as pretty JSON.
///
/// # Errors
///
/// Returns [`SaveError::Json`] if serialization fails.
pub fn to_json(records: &BTreeMap<FactionId, AiMemoryRecord>) -> Result<String, SaveError> {
    let block = AiSaveBlock {
        version: SAVE_VERSION,
        factions: records
            .iter()
            .map(|(id, record)| (id.to_string(), record.clone()))
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&block)?)
}

/// Parse an AI save block, skipping entries with malformed faction IDs.
///
/// # Errors
///
/// Returns [`SaveError::Json`] if the text is not a save block.
pub fn from_json(text: &str) -> Result<BTreeMap<FactionId, AiMemoryRecord>, SaveError> {
    let block: AiSaveBlock = serde_json::from_str(text)?;
    if block.version > SAVE_VERSION {
        warn!(
            version = block.version,
            supported = SAVE_VERSION,
            "AI save block is newer than this build, loading what it can"
        );
    }

    let mut records = BTreeMap::new();
    for (key, record) in block.factions {
        match key.parse::<FactionId>() {
            Ok(id) => {
                records.insert(id, record);
            }
            Err(e) => warn!(key = %key, error = %e, "Skipping AI record with bad faction id"),
        }
    }
    Ok(records)
}

/// Write the AI save block to `path`.
///
/// # Errors
///
/// Returns [`SaveError`] if serialization or the write fails.
pub fn write_ai_save(
    path: &Path,
    records: &BTreeMap<FactionId, AiMemoryRecord>,
) -> Result<(), SaveError> {
    let text = to_json(records)?;
    std::fs::write(path, text)?;
    info!(path = %path.display(), factions = records.len(), "AI save block written");
    Ok(())
}

/// Read the AI save block from `path`.
///
/// # Errors
///
/// Returns [`SaveError`] if the file cannot be read or parsed.
pub fn read_ai_save(path: &Path) -> Result<BTreeMap<FactionId, AiMemoryRecord>, SaveError> {
    let text = std::fs::read_to_string(path)?;
    let records = from_json(&text)?;
    info!(path = %path.display(), factions = records.len(), "AI save block read");
    Ok(records)
}
