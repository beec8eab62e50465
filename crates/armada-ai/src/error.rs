//! Error types for the armada-ai crate.
//!
//! A strategy that cannot finish its analysis returns an [`AiError`]
//! instead of panicking. The scheduler treats any error as "this faction
//! produces no actions this tick" and keeps the previously committed
//! memory.

use armada_types::FactionId;

/// Errors raised while a faction decides its turn.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AiError {
    /// A strategy aborted its analysis.
    #[error("strategy {strategy} failed: {reason}")]
    StrategyFailed {
        /// Name of the failing strategy.
        strategy: &'static str,
        /// Description of what went wrong.
        reason: String,
    },

    /// The snapshot handed to the AI belongs to another faction.
    #[error("snapshot for faction {snapshot} handed to faction {expected}")]
    ForeignSnapshot {
        /// Faction the AI decides for.
        expected: FactionId,
        /// Faction the snapshot was built for.
        snapshot: FactionId,
    },

    /// Date arithmetic left the representable calendar range.
    #[error("calendar overflow while {context}")]
    CalendarOverflow {
        /// What was being computed.
        context: String,
    },
}
