//! Error types for the `armada-world` crate.
//!
//! All fallible galaxy operations return [`WorldError`]. The commit phase
//! distinguishes stale references (an ID that no longer resolves) from
//! genuine rejections via [`WorldError::is_stale_reference`].

use armada_types::{FactionId, FleetId, PlanetId};

/// Errors that can occur while mutating or querying the galaxy.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A faction was not found in the galaxy.
    #[error("faction not found: {0}")]
    FactionNotFound(FactionId),

    /// A planet was not found in the galaxy.
    #[error("planet not found: {0}")]
    PlanetNotFound(PlanetId),

    /// A fleet was not found in the galaxy.
    #[error("fleet not found: {0}")]
    FleetNotFound(FleetId),

    /// A faction tried to command a planet it does not own.
    #[error("faction {faction} does not own planet {planet}")]
    PlanetNotOwned {
        /// The commanding faction.
        faction: FactionId,
        /// The planet.
        planet: PlanetId,
    },

    /// A faction tried to command a fleet it does not own.
    #[error("faction {faction} does not own fleet {fleet}")]
    FleetNotOwned {
        /// The commanding faction.
        faction: FactionId,
        /// The fleet.
        fleet: FleetId,
    },

    /// The faction treasury cannot cover the cost of an order.
    #[error("insufficient funds: needed {needed}, available {available}")]
    InsufficientFunds {
        /// Cost of the order.
        needed: u64,
        /// Current treasury.
        available: u64,
    },

    /// The order is well-formed but not valid in the current state.
    #[error("invalid order: {reason}")]
    InvalidOrder {
        /// Why the order was rejected.
        reason: String,
    },

    /// The technology is unknown or already researched.
    #[error("unknown or completed technology: {0}")]
    UnknownTech(String),

    /// A duplicate entity was inserted where uniqueness is required.
    #[error("duplicate faction id: {0}")]
    DuplicateFaction(FactionId),
}

impl WorldError {
    /// Whether the error stems from an ID that no longer resolves.
    ///
    /// Stale references are expected when an action list was computed
    /// against a snapshot and the referenced entity disappeared before
    /// commit. They are skipped rather than reported.
    pub const fn is_stale_reference(&self) -> bool {
        matches!(self, Self::PlanetNotFound(_) | Self::FleetNotFound(_))
    }
}
