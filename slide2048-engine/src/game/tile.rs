//! Tiles and Grid Cells

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::config::Geometry;

/// Grid coordinate. Orders row-major so board iteration is deterministic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Row index, 0 = top
    pub row: usize,
    /// Column index, 0 = left
    pub col: usize,
}

impl Cell {
    /// Create a cell.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Whether the cell lies on the board.
    #[inline]
    pub fn in_bounds(&self, geometry: &Geometry) -> bool {
        self.row < geometry.rows && self.col < geometry.cols
    }

    /// Pixel origin (top-left corner) of the cell.
    #[inline]
    pub fn origin(&self, geometry: &Geometry) -> (i32, i32) {
        (
            self.col as i32 * geometry.tile_width,
            self.row as i32 * geometry.tile_height,
        )
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Stable tile identity, unique within a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u32);

/// A numbered tile.
///
/// `cell` is the settled grid coordinate; `x`/`y` is the pixel position of
/// the tile's top-left corner, which drifts between cells while a move is
/// animating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Identity for merge bookkeeping and rendering
    pub id: TileId,
    /// Power of two, at least 2
    pub value: u32,
    /// Settled grid coordinate
    pub cell: Cell,
    /// Pixel x of the top-left corner
    pub x: i32,
    /// Pixel y of the top-left corner
    pub y: i32,
}

impl Tile {
    /// Create a tile resting on `cell`.
    pub fn new(id: TileId, value: u32, cell: Cell, geometry: &Geometry) -> Self {
        debug_assert!(is_tile_value(value), "invalid tile value {}", value);
        let (x, y) = cell.origin(geometry);
        Self { id, value, cell, x, y }
    }

    /// Move the pixel position by a delta.
    #[inline]
    pub fn translate(&mut self, (dx, dy): (i32, i32)) {
        self.x += dx;
        self.y += dy;
    }

    /// Put the pixel position back on the cell origin.
    #[inline]
    pub fn snap(&mut self, geometry: &Geometry) {
        let (x, y) = self.cell.origin(geometry);
        self.x = x;
        self.y = y;
    }

    /// Whether the pixel position sits exactly on the cell origin.
    #[inline]
    pub fn is_at_rest(&self, geometry: &Geometry) -> bool {
        (self.x, self.y) == self.cell.origin(geometry)
    }
}

/// A legal tile value: a power of two no smaller than 2.
#[inline]
pub fn is_tile_value(value: u32) -> bool {
    value >= 2 && value.is_power_of_two()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_ordering_is_row_major() {
        let mut cells = vec![Cell::new(1, 0), Cell::new(0, 3), Cell::new(0, 1)];
        cells.sort();
        assert_eq!(cells, vec![Cell::new(0, 1), Cell::new(0, 3), Cell::new(1, 0)]);
    }

    #[test]
    fn test_cell_origin_and_bounds() {
        let geometry = Geometry::default();
        assert_eq!(Cell::new(2, 3).origin(&geometry), (600, 400));
        assert!(Cell::new(3, 3).in_bounds(&geometry));
        assert!(!Cell::new(4, 0).in_bounds(&geometry));
    }

    #[test]
    fn test_tile_snap() {
        let geometry = Geometry::default();
        let mut tile = Tile::new(TileId(1), 2, Cell::new(0, 1), &geometry);
        assert!(tile.is_at_rest(&geometry));

        tile.translate((-20, 0));
        assert_eq!((tile.x, tile.y), (180, 0));
        assert!(!tile.is_at_rest(&geometry));

        tile.snap(&geometry);
        assert_eq!((tile.x, tile.y), (200, 0));
    }

    #[test]
    fn test_tile_values() {
        assert!(is_tile_value(2));
        assert!(is_tile_value(2048));
        assert!(!is_tile_value(1));
        assert!(!is_tile_value(0));
        assert!(!is_tile_value(6));
    }
}
