//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every entity the AI reasons about has a strongly-typed ID so that a
//! fleet identifier can never be handed to a planet lookup. All IDs use
//! UUID v7 (time-ordered), which keeps `BTreeMap` iteration in creation
//! order and makes save files diff-friendly.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl core::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a faction (AI-controlled or not).
    FactionId
}

define_id! {
    /// Unique identifier for a planet.
    PlanetId
}

define_id! {
    /// Unique identifier for a fleet.
    FleetId
}

define_id! {
    /// Unique identifier for a combat unit inside a battle.
    UnitId
}

define_id! {
    /// Unique identifier for a space battle.
    BattleId
}
