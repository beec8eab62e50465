//! World clock mapping ticks onto the game calendar.
//!
//! The tick counter is the source of truth. The game date is derived from
//! it as `start + tick * hours_per_tick` and never stored independently.
//! All arithmetic is checked.

use chrono::{NaiveDateTime, TimeDelta};

/// Errors that can occur during clock operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// The derived date left the representable calendar.
    #[error("calendar overflow at tick {tick}")]
    CalendarOverflow {
        /// Tick whose date could not be computed.
        tick: u64,
    },

    /// Invalid time configuration.
    #[error("invalid time configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Tick counter plus game calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldClock {
    /// Current tick (0 before the first tick has run).
    tick: u64,
    /// Game date of tick 0.
    start: NaiveDateTime,
    /// Game hours that pass per tick.
    hours_per_tick: u32,
}

impl WorldClock {
    /// Create a clock at tick 0.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `hours_per_tick` is 0.
    pub fn new(start: NaiveDateTime, hours_per_tick: u32) -> Result<Self, ClockError> {
        Self::from_parts(0, start, hours_per_tick)
    }

    /// Create a clock at an arbitrary tick (state restoration, tests).
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `hours_per_tick` is 0.
    pub fn from_parts(
        tick: u64,
        start: NaiveDateTime,
        hours_per_tick: u32,
    ) -> Result<Self, ClockError> {
        if hours_per_tick == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "hours_per_tick must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            tick,
            start,
            hours_per_tick,
        })
    }

    /// Advance by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// Current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Game date of tick 0.
    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Game hours per tick.
    pub const fn hours_per_tick(&self) -> u32 {
        self.hours_per_tick
    }

    /// Game date of the current tick.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::CalendarOverflow`] if the date is not
    /// representable.
    pub fn now(&self) -> Result<NaiveDateTime, ClockError> {
        let overflow = ClockError::CalendarOverflow { tick: self.tick };
        let hours = self
            .tick
            .checked_mul(u64::from(self.hours_per_tick))
            .and_then(|h| i64::try_from(h).ok())
            .ok_or_else(|| overflow.clone())?;
        TimeDelta::try_hours(hours)
            .and_then(|delta| self.start.checked_add_signed(delta))
            .ok_or(overflow)
    }
}
