//! Per-faction AI memory that survives across ticks and saves.
//!
//! [`AiMemory`] holds what a faction has learned on its own: which fleets
//! it keeps home as planetary guards, which grid cells its radar has ever
//! covered, how strong its rivals looked in past battles, and when it
//! plans to launch the next offensive.
//!
//! Memory is owned by the faction's scheduler slot. A decide task works
//! on a clone and hands the updated copy back with its actions; if the
//! turn fails or is cancelled the clone is dropped and the last committed
//! memory stays in place.

use std::collections::{BTreeMap, BTreeSet};

use armada_types::{FactionId, FleetId, GalaxyBounds, GridCell, Position};
use chrono::NaiveDateTime;

/// Fallback cell size used when a non-positive size is configured.
const MIN_CELL_SIZE: f64 = 1.0;

// ---------------------------------------------------------------------------
// Exploration
// ---------------------------------------------------------------------------

/// Cells of the exploration grid the faction's radar has ever covered.
///
/// Cells are only ever added. The unexplored remainder of the galaxy
/// therefore shrinks monotonically and never grows back.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorationMap {
    /// Side length of one grid cell.
    cell_size: f64,
    /// Every explored cell.
    explored: BTreeSet<GridCell>,
}

impl ExplorationMap {
    /// Create an empty map with the given cell size.
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size: cell_size.max(MIN_CELL_SIZE),
            explored: BTreeSet::new(),
        }
    }

    /// Side length of one grid cell.
    pub const fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of explored cells.
    pub fn len(&self) -> usize {
        self.explored.len()
    }

    /// Whether nothing has been explored yet.
    pub fn is_empty(&self) -> bool {
        self.explored.is_empty()
    }

    /// Explored cells in ascending order.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        self.explored.iter().copied()
    }

    /// Whether a cell has been explored.
    pub fn contains(&self, cell: GridCell) -> bool {
        self.explored.contains(&cell)
    }

    /// Whether the cell containing `position` has been explored.
    pub fn is_explored(&self, position: Position) -> bool {
        self.contains(GridCell::containing(position, self.cell_size))
    }

    /// Mark one cell explored. Returns `true` if it was new.
    pub fn insert(&mut self, cell: GridCell) -> bool {
        self.explored.insert(cell)
    }

    /// Mark every cell covered by a radar circle as explored.
    ///
    /// A cell is covered when its center lies inside the circle. The cell
    /// holding the radar source itself is always covered. Only cells of
    /// the grid covering `bounds` are scanned. Returns the number of newly
    /// explored cells.
    pub fn reveal(&mut self, center: Position, radius: f64, bounds: GalaxyBounds) -> usize {
        let before = self.explored.len();
        self.explored
            .insert(GridCell::containing(center, self.cell_size));

        if radius > 0.0 {
            let (columns, rows) = self.grid_extent(bounds);
            let low = GridCell::containing(
                Position::new(center.x - radius, center.y - radius),
                self.cell_size,
            );
            let high = GridCell::containing(
                Position::new(center.x + radius, center.y + radius),
                self.cell_size,
            );
            for x in low.x.max(0)..=high.x.min(columns.saturating_sub(1)) {
                for y in low.y.max(0)..=high.y.min(rows.saturating_sub(1)) {
                    let cell = GridCell::new(x, y);
                    if cell.center(self.cell_size).distance_to(center) <= radius {
                        self.explored.insert(cell);
                    }
                }
            }
        }

        self.explored.len().saturating_sub(before)
    }

    /// Column and row count of the grid covering `bounds`.
    #[allow(clippy::cast_possible_truncation)]
    fn grid_extent(&self, bounds: GalaxyBounds) -> (i32, i32) {
        let columns = (bounds.width / self.cell_size).ceil().max(0.0) as i32;
        let rows = (bounds.height / self.cell_size).ceil().max(0.0) as i32;
        (columns, rows)
    }

    /// Number of grid cells inside `bounds` not yet explored.
    pub fn unexplored_count(&self, bounds: GalaxyBounds) -> usize {
        let (columns, rows) = self.grid_extent(bounds);
        (0..columns)
            .flat_map(|x| (0..rows).map(move |y| GridCell::new(x, y)))
            .filter(|cell| !self.explored.contains(cell))
            .count()
    }

    /// The unexplored cell inside `bounds` closest to `from`, skipping
    /// `exclude`, together with the in-bounds point to travel to.
    pub fn nearest_unexplored(
        &self,
        from: Position,
        bounds: GalaxyBounds,
        exclude: &BTreeSet<GridCell>,
    ) -> Option<(GridCell, Position)> {
        let (columns, rows) = self.grid_extent(bounds);
        (0..columns)
            .flat_map(|x| (0..rows).map(move |y| GridCell::new(x, y)))
            .filter(|cell| !self.explored.contains(cell) && !exclude.contains(cell))
            .map(|cell| {
                let center = cell.center(self.cell_size);
                let point = Position::new(
                    center.x.clamp(0.0, bounds.width),
                    center.y.clamp(0.0, bounds.height),
                );
                (cell, point)
            })
            .min_by(|a, b| a.1.distance_to(from).total_cmp(&b.1.distance_to(from)))
    }
}

// ---------------------------------------------------------------------------
// Opponent strength
// ---------------------------------------------------------------------------

/// Smoothed estimate of a rival's military strength.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OpponentStrength {
    /// Estimated attack of the rival's assault fleets.
    pub attack: Option<f64>,
    /// Estimated defense of the rival's planets.
    pub defense: Option<f64>,
}

/// Blend a new observation into an estimate. The first one is taken as is.
fn smooth(previous: Option<f64>, observed: f64, weight: f64) -> f64 {
    let weight = weight.clamp(0.0, 1.0);
    previous.map_or(observed, |old| old.mul_add(1.0 - weight, observed * weight))
}

// ---------------------------------------------------------------------------
// AiMemory
// ---------------------------------------------------------------------------

/// Everything one AI faction remembers between ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct AiMemory {
    /// Fleets reserved for planetary defense.
    pub defensive_fleets: BTreeSet<FleetId>,
    /// Radar coverage accumulated over the whole game.
    pub exploration: ExplorationMap,
    /// Learned strength of each rival.
    pub opponent_strength: BTreeMap<FactionId, OpponentStrength>,
    /// When the next offensive is due, if one is scheduled.
    pub next_attack_time: Option<NaiveDateTime>,
}

impl AiMemory {
    /// Empty memory using the given exploration cell size.
    pub fn new(cell_size: f64) -> Self {
        Self {
            defensive_fleets: BTreeSet::new(),
            exploration: ExplorationMap::new(cell_size),
            opponent_strength: BTreeMap::new(),
            next_attack_time: None,
        }
    }

    /// Whether a fleet is reserved for defense.
    pub fn is_defensive(&self, fleet: FleetId) -> bool {
        self.defensive_fleets.contains(&fleet)
    }

    /// Flag or unflag a fleet as defensive.
    pub fn set_defensive(&mut self, fleet: FleetId, defensive: bool) {
        if defensive {
            self.defensive_fleets.insert(fleet);
        } else {
            self.defensive_fleets.remove(&fleet);
        }
    }

    /// Record the attack strength a rival showed in an assault.
    pub fn observe_attack(&mut self, rival: FactionId, attack: f64, weight: f64) {
        let entry = self.opponent_strength.entry(rival).or_default();
        entry.attack = Some(smooth(entry.attack, attack, weight));
    }

    /// Record the defense a rival's planet showed against an assault.
    pub fn observe_defense(&mut self, rival: FactionId, defense: f64, weight: f64) {
        let entry = self.opponent_strength.entry(rival).or_default();
        entry.defense = Some(smooth(entry.defense, defense, weight));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn bounds() -> GalaxyBounds {
        GalaxyBounds {
            width: 100.0,
            height: 100.0,
        }
    }

    #[test]
    fn reveal_covers_cells_whose_center_is_in_range() {
        let mut map = ExplorationMap::new(10.0);
        let added = map.reveal(Position::new(55.0, 55.0), 10.0, bounds());
        assert_eq!(added, 5);
        assert!(map.contains(GridCell::new(5, 5)));
        assert!(map.contains(GridCell::new(4, 5)));
        assert!(map.contains(GridCell::new(5, 6)));
        assert!(!map.contains(GridCell::new(6, 6)));
    }

    #[test]
    fn exploration_never_shrinks() {
        let mut map = ExplorationMap::new(10.0);
        let mut remaining = map.unexplored_count(bounds());
        assert_eq!(remaining, 100);
        for step in 0..10_u32 {
            let x = f64::from(step) * 9.0;
            map.reveal(Position::new(x, x), 12.0, bounds());
            let now = map.unexplored_count(bounds());
            assert!(now <= remaining);
            remaining = now;
        }
        assert!(remaining < 100);
    }

    #[test]
    fn huge_radius_is_capped_to_the_galaxy_grid() {
        let mut map = ExplorationMap::new(10.0);
        let added = map.reveal(Position::new(50.0, 50.0), 1.0e12, bounds());
        assert_eq!(added, 100);
        assert_eq!(map.unexplored_count(bounds()), 0);
        assert!(!map.contains(GridCell::new(-1, 0)));
        assert!(!map.contains(GridCell::new(10, 10)));
        assert_eq!(map.reveal(Position::new(50.0, 50.0), f64::INFINITY, bounds()), 0);
    }

    #[test]
    fn zero_radius_still_reveals_own_cell() {
        let mut map = ExplorationMap::new(10.0);
        assert_eq!(map.reveal(Position::new(3.0, 3.0), 0.0, bounds()), 1);
        assert!(map.is_explored(Position::new(9.0, 9.0)));
    }

    #[test]
    fn nearest_unexplored_skips_explored_and_excluded() {
        let mut map = ExplorationMap::new(50.0);
        map.insert(GridCell::new(0, 0));
        let exclude = BTreeSet::from([GridCell::new(1, 0)]);
        let (cell, point) = map
            .nearest_unexplored(Position::new(10.0, 10.0), bounds(), &exclude)
            .unwrap();
        assert_eq!(cell, GridCell::new(0, 1));
        assert_eq!(point, Position::new(25.0, 75.0));
    }

    #[test]
    fn nearest_unexplored_clamps_into_bounds() {
        let map = ExplorationMap::new(40.0);
        let small = GalaxyBounds {
            width: 50.0,
            height: 30.0,
        };
        let (cell, point) = map
            .nearest_unexplored(Position::new(49.0, 1.0), small, &BTreeSet::new())
            .unwrap();
        assert_eq!(cell, GridCell::new(1, 0));
        assert_eq!(point, Position::new(50.0, 20.0));
    }

    #[test]
    fn fully_explored_galaxy_has_no_target() {
        let mut map = ExplorationMap::new(60.0);
        for x in 0..2 {
            for y in 0..2 {
                map.insert(GridCell::new(x, y));
            }
        }
        assert!(map
            .nearest_unexplored(Position::default(), bounds(), &BTreeSet::new())
            .is_none());
        assert_eq!(map.unexplored_count(bounds()), 0);
    }

    #[test]
    fn opponent_estimate_is_smoothed() {
        let mut memory = AiMemory::new(25.0);
        let rival = FactionId::new();
        memory.observe_defense(rival, 40.0, 0.5);
        assert_eq!(memory.opponent_strength[&rival].defense, Some(40.0));
        memory.observe_defense(rival, 20.0, 0.5);
        assert_eq!(memory.opponent_strength[&rival].defense, Some(30.0));
        assert_eq!(memory.opponent_strength[&rival].attack, None);
    }

    #[test]
    fn defensive_flag_toggles() {
        let mut memory = AiMemory::new(25.0);
        let fleet = FleetId::new();
        memory.set_defensive(fleet, true);
        assert!(memory.is_defensive(fleet));
        memory.set_defensive(fleet, false);
        assert!(!memory.is_defensive(fleet));
    }
}
