//! Galaxy-plane geometry: continuous positions and the discrete grid used
//! for exploration coverage.
//!
//! Positions are continuous `f64` coordinates. The exploration grid splits
//! the plane into square cells of a configurable size; a [`GridCell`] is
//! persisted as an `x;y` token.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// A point on the galaxy plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Create a position from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Move toward `target` by at most `step`, stopping exactly on it.
    pub fn step_toward(self, target: Self, step: f64) -> Self {
        let distance = self.distance_to(target);
        if distance <= step || distance <= f64::EPSILON {
            return target;
        }
        let ratio = step / distance;
        Self {
            x: (target.x - self.x).mul_add(ratio, self.x),
            y: (target.y - self.y).mul_add(ratio, self.y),
        }
    }
}

/// Rectangular extent of the playable galaxy, anchored at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GalaxyBounds {
    /// Width of the galaxy plane.
    pub width: f64,
    /// Height of the galaxy plane.
    pub height: f64,
}

impl GalaxyBounds {
    /// Whether a position lies inside the bounds.
    pub fn contains(&self, position: Position) -> bool {
        (0.0..=self.width).contains(&position.x) && (0.0..=self.height).contains(&position.y)
    }
}

/// One cell of the exploration grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridCell {
    /// Column index.
    pub x: i32,
    /// Row index.
    pub y: i32,
}

impl GridCell {
    /// Create a cell from its indices.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell containing `position` for the given cell size.
    #[allow(clippy::cast_possible_truncation)]
    pub fn containing(position: Position, cell_size: f64) -> Self {
        Self {
            x: (position.x / cell_size).floor() as i32,
            y: (position.y / cell_size).floor() as i32,
        }
    }

    /// The center point of this cell for the given cell size.
    pub fn center(self, cell_size: f64) -> Position {
        Position {
            x: (f64::from(self.x) + 0.5) * cell_size,
            y: (f64::from(self.y) + 0.5) * cell_size,
        }
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.x, self.y)
    }
}

/// Error returned when an `x;y` token cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed grid cell token: {token:?}")]
pub struct ParseCellError {
    /// The offending token.
    pub token: String,
}

impl FromStr for GridCell {
    type Err = ParseCellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseCellError {
            token: s.to_owned(),
        };
        let (x, y) = s.split_once(';').ok_or_else(malformed)?;
        let x = x.trim().parse().map_err(|_| malformed())?;
        let y = y.trim().parse().map_err(|_| malformed())?;
        Ok(Self { x, y })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_token_roundtrip() {
        let cell = GridCell::new(-3, 14);
        assert_eq!(cell.to_string(), "-3;14");
        assert_eq!("-3;14".parse::<GridCell>(), Ok(cell));
    }

    #[test]
    fn malformed_cell_tokens_are_rejected() {
        assert!("3".parse::<GridCell>().is_err());
        assert!("a;1".parse::<GridCell>().is_err());
        assert!("1;".parse::<GridCell>().is_err());
    }

    #[test]
    fn containing_cell_floors_negative_coordinates() {
        let cell = GridCell::containing(Position::new(-0.5, 25.0), 10.0);
        assert_eq!(cell, GridCell::new(-1, 2));
    }

    #[test]
    fn step_toward_stops_on_target() {
        let from = Position::new(0.0, 0.0);
        let to = Position::new(3.0, 4.0);
        assert_eq!(from.step_toward(to, 10.0), to);
        let mid = from.step_toward(to, 2.5);
        assert!((mid.distance_to(from) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn bounds_contain_edges() {
        let bounds = GalaxyBounds {
            width: 100.0,
            height: 50.0,
        };
        assert!(bounds.contains(Position::new(100.0, 50.0)));
        assert!(!bounds.contains(Position::new(100.1, 0.0)));
    }
}
