//! Board State
//!
//! Sparse mapping from grid cell to tile. Uses BTreeMap so iteration is
//! row-major and identical on every run.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::config::{Geometry, SpawnDistribution};
use crate::core::rng::DeterministicRng;
use crate::game::tile::{is_tile_value, Cell, Tile, TileId};

/// Board errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Every cell is occupied.
    #[error("board is full")]
    Full,

    /// Cell lies outside the grid.
    #[error("cell {0} is off the board")]
    OutOfBounds(Cell),

    /// Cell already holds a tile.
    #[error("cell {0} is occupied")]
    Occupied(Cell),

    /// Value is not a power of two of at least 2.
    #[error("{0} is not a valid tile value")]
    InvalidValue(u32),

    /// Two tiles were keyed to the same cell.
    #[error("two tiles settled on {0}")]
    Collision(Cell),
}

/// Which values a spawned tile may take.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnKind {
    /// Opening tiles: always 2
    Opening,
    /// After a move: 2 or 4 per the distribution
    AfterMove(SpawnDistribution),
}

impl SpawnKind {
    fn roll_value(self, rng: &mut DeterministicRng) -> u32 {
        match self {
            SpawnKind::Opening => 2,
            SpawnKind::AfterMove(dist) => {
                if rng.roll_per_mille(dist.four_per_mille) {
                    4
                } else {
                    2
                }
            }
        }
    }
}

/// The grid and every tile on it.
#[derive(Clone, Debug)]
pub struct Board {
    geometry: Geometry,
    tiles: BTreeMap<Cell, Tile>,
    next_id: u32,
}

impl Board {
    /// Empty board.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            tiles: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Board with tiles at rest on the given cells.
    pub fn with_tiles(
        geometry: Geometry,
        tiles: impl IntoIterator<Item = (Cell, u32)>,
    ) -> Result<Self, BoardError> {
        let mut board = Self::new(geometry);
        for (cell, value) in tiles {
            board.place(cell, value)?;
        }
        Ok(board)
    }

    /// Board from row-major values, 0 meaning empty.
    pub fn from_rows<const C: usize>(geometry: Geometry, rows: &[[u32; C]]) -> Result<Self, BoardError> {
        let tiles = rows.iter().enumerate().flat_map(|(row, values)| {
            values
                .iter()
                .enumerate()
                .filter_map(move |(col, &value)| (value != 0).then_some((Cell::new(row, col), value)))
        });
        Self::with_tiles(geometry, tiles)
    }

    /// Board dimensions.
    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Put a new tile at rest on an empty cell.
    pub fn place(&mut self, cell: Cell, value: u32) -> Result<Tile, BoardError> {
        if !cell.in_bounds(&self.geometry) {
            return Err(BoardError::OutOfBounds(cell));
        }
        if !is_tile_value(value) {
            return Err(BoardError::InvalidValue(value));
        }
        if self.tiles.contains_key(&cell) {
            return Err(BoardError::Occupied(cell));
        }
        let tile = Tile::new(self.allocate_id(), value, cell, &self.geometry);
        self.tiles.insert(cell, tile);
        Ok(tile)
    }

    /// Spawn a tile on a uniformly random empty cell.
    ///
    /// Samples random cells until one is free. Callers must not spawn on a
    /// full board; doing so returns `BoardError::Full` instead of looping.
    pub fn spawn_tile(&mut self, rng: &mut DeterministicRng, kind: SpawnKind) -> Result<Tile, BoardError> {
        if self.is_full() {
            return Err(BoardError::Full);
        }

        let cell = loop {
            let row = rng.next_index(self.geometry.rows);
            let col = rng.next_index(self.geometry.cols);
            let cell = Cell::new(row, col);
            if !self.tiles.contains_key(&cell) {
                break cell;
            }
        };

        let value = kind.roll_value(rng);
        debug!(%cell, value, "tile spawned");
        self.place(cell, value)
    }

    /// Every cell is occupied.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.tiles.len() == self.geometry.capacity()
    }

    /// Some move would change the board: an empty cell exists, or two
    /// orthogonally adjacent tiles share a value.
    pub fn has_legal_move(&self) -> bool {
        if !self.is_full() {
            return true;
        }
        self.tiles.iter().any(|(cell, tile)| {
            let right = Cell::new(cell.row, cell.col + 1);
            let below = Cell::new(cell.row + 1, cell.col);
            [right, below]
                .iter()
                .filter_map(|next| self.tiles.get(next))
                .any(|next| next.value == tile.value)
        })
    }

    /// Replace all entries, keying each tile by its current cell.
    ///
    /// On a collision the board is left unchanged.
    pub fn rebuild_from(&mut self, tiles: impl IntoIterator<Item = Tile>) -> Result<(), BoardError> {
        let mut rebuilt = BTreeMap::new();
        for tile in tiles {
            if rebuilt.insert(tile.cell, tile).is_some() {
                return Err(BoardError::Collision(tile.cell));
            }
        }
        self.tiles = rebuilt;
        Ok(())
    }

    /// Put every tile's pixel position back on its cell origin.
    pub fn snap_to_grid(&mut self) {
        let geometry = self.geometry;
        for tile in self.tiles.values_mut() {
            tile.snap(&geometry);
        }
    }

    /// Tile on a cell.
    #[inline]
    pub fn get(&self, cell: Cell) -> Option<&Tile> {
        self.tiles.get(&cell)
    }

    /// Value on a cell.
    #[inline]
    pub fn value_at(&self, row: usize, col: usize) -> Option<u32> {
        self.get(Cell::new(row, col)).map(|tile| tile.value)
    }

    /// Tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// Number of tiles.
    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// No tiles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Sum of all tile values.
    pub fn total_value(&self) -> u64 {
        self.tiles.values().map(|tile| tile.value as u64).sum()
    }

    /// Largest tile value (0 if empty).
    pub fn max_value(&self) -> u32 {
        self.tiles.values().map(|tile| tile.value).max().unwrap_or(0)
    }

    /// Row-major grid of values, 0 meaning empty.
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        let mut rows = vec![vec![0; self.geometry.cols]; self.geometry.rows];
        for (cell, tile) in &self.tiles {
            rows[cell.row][cell.col] = tile.value;
        }
        rows
    }

    fn allocate_id(&mut self) -> TileId {
        let id = TileId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_rows() {
            let line: Vec<String> = row
                .iter()
                .map(|&value| match value {
                    0 => format!("{:>5}", "."),
                    v => format!("{:>5}", v),
                })
                .collect();
            writeln!(f, "{}", line.join(""))?;
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
