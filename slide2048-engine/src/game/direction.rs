//! Move Directions
//!
//! The four moves differ only in which axis tiles travel along and which
//! edge they travel toward. `MoveRule` captures that once, and every
//! direction-dependent question the resolver asks goes through it.

use std::cmp::Ordering;
use std::fmt;
use serde::{Serialize, Deserialize};

use crate::config::Geometry;
use crate::game::tile::{Cell, Tile};

/// A player move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Direction {
    /// Toward column 0
    Left = 0,
    /// Toward the last column
    Right = 1,
    /// Toward row 0
    Up = 2,
    /// Toward the last row
    Down = 3,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Movement rule for this direction.
    #[inline]
    pub fn rule(self) -> MoveRule {
        MoveRule::for_direction(self)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        };
        f.write_str(name)
    }
}

/// Grid axis tiles travel along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Vertical travel (up/down): the row changes
    Row,
    /// Horizontal travel (left/right): the column changes
    Col,
}

/// Edge tiles travel toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toward {
    /// Row/column 0 (left, up)
    Zero,
    /// Last row/column (right, down)
    Max,
}

/// How a pixel position converts back to a grid index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rounding {
    /// Round up: used when travelling toward index 0
    Ceil,
    /// Round down: used when travelling toward the last index
    Floor,
}

impl Rounding {
    /// Grid index of a pixel position, before clamping.
    #[inline]
    pub fn to_index(self, position: i32, extent: i32) -> i32 {
        match self {
            Rounding::Floor => position.div_euclid(extent),
            Rounding::Ceil => -(-position).div_euclid(extent),
        }
    }
}

/// Direction-specific parameters of a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveRule {
    /// The move this rule describes
    pub direction: Direction,
    /// Primary axis
    pub axis: Axis,
    /// Destination edge
    pub toward: Toward,
}

impl MoveRule {
    /// Rule for a direction.
    pub const fn for_direction(direction: Direction) -> Self {
        let (axis, toward) = match direction {
            Direction::Left => (Axis::Col, Toward::Zero),
            Direction::Right => (Axis::Col, Toward::Max),
            Direction::Up => (Axis::Row, Toward::Zero),
            Direction::Down => (Axis::Row, Toward::Max),
        };
        Self { direction, axis, toward }
    }

    /// -1 toward index 0, +1 toward the last index.
    #[inline]
    pub fn sign(&self) -> i32 {
        match self.toward {
            Toward::Zero => -1,
            Toward::Max => 1,
        }
    }

    /// Rounding used when re-deriving a tile's cell.
    ///
    /// A tile travelling toward 0 has its leading edge below the cell origin
    /// it came from, so rounding up keeps it in that cell until it has fully
    /// arrived; the mirror holds for travel toward the last index.
    #[inline]
    pub fn rounding(&self) -> Rounding {
        match self.toward {
            Toward::Zero => Rounding::Ceil,
            Toward::Max => Rounding::Floor,
        }
    }

    /// Per-pass pixel delta.
    #[inline]
    pub fn step_delta(&self, geometry: &Geometry) -> (i32, i32) {
        let step = geometry.step * self.sign();
        match self.axis {
            Axis::Col => (step, 0),
            Axis::Row => (0, step),
        }
    }

    /// Tile size along the primary axis.
    #[inline]
    pub fn extent(&self, geometry: &Geometry) -> i32 {
        match self.axis {
            Axis::Col => geometry.tile_width,
            Axis::Row => geometry.tile_height,
        }
    }

    /// Grid index along the primary axis.
    #[inline]
    pub fn primary(&self, cell: Cell) -> usize {
        match self.axis {
            Axis::Col => cell.col,
            Axis::Row => cell.row,
        }
    }

    /// Pixel position along the primary axis.
    #[inline]
    pub fn position(&self, tile: &Tile) -> i32 {
        match self.axis {
            Axis::Col => tile.x,
            Axis::Row => tile.y,
        }
    }

    /// Index of the edge tiles travel toward.
    #[inline]
    pub fn edge(&self, geometry: &Geometry) -> usize {
        match (self.toward, self.axis) {
            (Toward::Zero, _) => 0,
            (Toward::Max, Axis::Col) => geometry.cols - 1,
            (Toward::Max, Axis::Row) => geometry.rows - 1,
        }
    }

    /// Tile already sits on the destination edge.
    #[inline]
    pub fn is_at_boundary(&self, tile: &Tile, geometry: &Geometry) -> bool {
        self.primary(tile.cell) == self.edge(geometry)
    }

    /// The cell immediately ahead of `cell`, if it is on the board.
    pub fn ahead(&self, cell: Cell, geometry: &Geometry) -> Option<Cell> {
        let next = match (self.axis, self.toward) {
            (Axis::Col, Toward::Zero) => Cell::new(cell.row, cell.col.checked_sub(1)?),
            (Axis::Col, Toward::Max) => Cell::new(cell.row, cell.col + 1),
            (Axis::Row, Toward::Zero) => Cell::new(cell.row.checked_sub(1)?, cell.col),
            (Axis::Row, Toward::Max) => Cell::new(cell.row + 1, cell.col),
        };
        next.in_bounds(geometry).then_some(next)
    }

    /// Pixels between the tile and the neighbor ahead, along the direction of travel.
    #[inline]
    pub fn gap(&self, tile: &Tile, neighbor: &Tile) -> i32 {
        (self.position(tile) - self.position(neighbor)) * -self.sign()
    }

    /// Tile is still sliding into an equal neighbor.
    #[inline]
    pub fn merge_in_progress(&self, tile: &Tile, neighbor: &Tile, geometry: &Geometry) -> bool {
        self.gap(tile, neighbor) > geometry.step
    }

    /// Tile can still close in on a neighbor it will not merge with.
    #[inline]
    pub fn clear_to_move(&self, tile: &Tile, neighbor: &Tile, geometry: &Geometry) -> bool {
        self.gap(tile, neighbor) > self.extent(geometry) + geometry.step
    }

    /// Processing order: tiles nearest the destination edge first.
    pub fn order(&self, a: &Tile, b: &Tile) -> Ordering {
        let by_axis = self.primary(a.cell).cmp(&self.primary(b.cell));
        let by_axis = match self.toward {
            Toward::Zero => by_axis,
            Toward::Max => by_axis.reverse(),
        };
        by_axis.then_with(|| a.cell.cmp(&b.cell))
    }

    /// Re-derive the tile's cell from its pixel position.
    pub fn settle(&self, tile: &mut Tile, geometry: &Geometry) {
        let rounding = self.rounding();
        let row = rounding.to_index(tile.y, geometry.tile_height);
        let col = rounding.to_index(tile.x, geometry.tile_width);
        tile.cell = Cell::new(
            row.clamp(0, geometry.rows as i32 - 1) as usize,
            col.clamp(0, geometry.cols as i32 - 1) as usize,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tile::TileId;

    fn tile_at(x: i32, y: i32, cell: Cell) -> Tile {
        Tile { id: TileId(0), value: 2, cell, x, y }
    }

    #[test]
    fn test_rounding() {
        assert_eq!(Rounding::Ceil.to_index(37, 200), 1);
        assert_eq!(Rounding::Floor.to_index(163, 200), 0);
        assert_eq!(Rounding::Ceil.to_index(200, 200), 1);
        assert_eq!(Rounding::Floor.to_index(200, 200), 1);
        assert_eq!(Rounding::Ceil.to_index(-3, 200), 0);
        assert_eq!(Rounding::Floor.to_index(-3, 200), -1);
    }

    #[test]
    fn test_rule_table() {
        let left = Direction::Left.rule();
        assert_eq!((left.axis, left.toward, left.rounding()), (Axis::Col, Toward::Zero, Rounding::Ceil));
        let down = Direction::Down.rule();
        assert_eq!((down.axis, down.toward, down.rounding()), (Axis::Row, Toward::Max, Rounding::Floor));

        let geometry = Geometry::default();
        assert_eq!(Direction::Left.rule().step_delta(&geometry), (-20, 0));
        assert_eq!(Direction::Right.rule().step_delta(&geometry), (20, 0));
        assert_eq!(Direction::Up.rule().step_delta(&geometry), (0, -20));
        assert_eq!(Direction::Down.rule().step_delta(&geometry), (0, 20));
    }

    #[test]
    fn test_ahead() {
        let geometry = Geometry::default();
        let corner = Cell::new(0, 0);
        assert_eq!(Direction::Left.rule().ahead(corner, &geometry), None);
        assert_eq!(Direction::Up.rule().ahead(corner, &geometry), None);
        assert_eq!(Direction::Right.rule().ahead(corner, &geometry), Some(Cell::new(0, 1)));
        assert_eq!(Direction::Down.rule().ahead(corner, &geometry), Some(Cell::new(1, 0)));

        let far = Cell::new(3, 3);
        assert_eq!(Direction::Right.rule().ahead(far, &geometry), None);
        assert_eq!(Direction::Down.rule().ahead(far, &geometry), None);
    }

    #[test]
    fn test_boundary() {
        let geometry = Geometry::default();
        let tile = tile_at(600, 0, Cell::new(0, 3));
        assert!(Direction::Right.rule().is_at_boundary(&tile, &geometry));
        assert!(Direction::Up.rule().is_at_boundary(&tile, &geometry));
        assert!(!Direction::Left.rule().is_at_boundary(&tile, &geometry));
        assert!(!Direction::Down.rule().is_at_boundary(&tile, &geometry));
    }

    #[test]
    fn test_gap_predicates() {
        let geometry = Geometry::default();
        let left = Direction::Left.rule();
        let neighbor = tile_at(0, 0, Cell::new(0, 0));

        let touching = tile_at(20, 0, Cell::new(0, 1));
        assert_eq!(left.gap(&touching, &neighbor), 20);
        assert!(!left.merge_in_progress(&touching, &neighbor, &geometry));

        let adjacent = tile_at(200, 0, Cell::new(0, 1));
        assert!(left.merge_in_progress(&adjacent, &neighbor, &geometry));
        assert!(!left.clear_to_move(&adjacent, &neighbor, &geometry));

        let distant = tile_at(240, 0, Cell::new(0, 2));
        assert!(left.clear_to_move(&distant, &neighbor, &geometry));

        let right = Direction::Right.rule();
        let ahead = tile_at(600, 0, Cell::new(0, 3));
        let behind = tile_at(360, 0, Cell::new(0, 1));
        assert_eq!(right.gap(&behind, &ahead), 240);
        assert!(right.clear_to_move(&behind, &ahead, &geometry));
    }

    #[test]
    fn test_order() {
        let a = tile_at(0, 0, Cell::new(0, 0));
        let b = tile_at(400, 0, Cell::new(0, 2));
        assert_eq!(Direction::Left.rule().order(&a, &b), Ordering::Less);
        assert_eq!(Direction::Right.rule().order(&a, &b), Ordering::Greater);
    }

    #[test]
    fn test_settle_rounds_by_direction() {
        let geometry = Geometry::default();

        let mut moving_left = tile_at(180, 0, Cell::new(0, 1));
        Direction::Left.rule().settle(&mut moving_left, &geometry);
        assert_eq!(moving_left.cell, Cell::new(0, 1));

        let mut moving_right = tile_at(163, 0, Cell::new(0, 0));
        Direction::Right.rule().settle(&mut moving_right, &geometry);
        assert_eq!(moving_right.cell, Cell::new(0, 0));

        let mut overshoot = tile_at(-3, 0, Cell::new(0, 1));
        Direction::Left.rule().settle(&mut overshoot, &geometry);
        assert_eq!(overshoot.cell, Cell::new(0, 0));
    }
}
