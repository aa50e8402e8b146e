//! Render Snapshot
//!
//! Read-only view of a game handed to front ends each frame. Carries the
//! continuous pixel positions, so an animating move renders mid-slide.

use serde::Serialize;

use crate::game::palette::{tile_color, Rgb};
use crate::game::state::{GamePhase, GameState};
use crate::game::tile::{Cell, TileId};

/// One tile as it should be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TileView {
    /// Stable identity across frames
    pub id: TileId,
    /// Number shown on the tile
    pub value: u32,
    /// Settled grid coordinate
    pub cell: Cell,
    /// Pixel x of the top-left corner
    pub x: i32,
    /// Pixel y of the top-left corner
    pub y: i32,
    /// Fill colour
    pub color: Rgb,
}

/// Everything needed to draw one frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    /// Window width in pixels
    pub width: i32,
    /// Window height in pixels
    pub height: i32,
    /// Tile width in pixels
    pub tile_width: i32,
    /// Tile height in pixels
    pub tile_height: i32,
    /// Grid rows
    pub rows: usize,
    /// Grid columns
    pub cols: usize,
    /// Tiles in row-major order of their cells
    pub tiles: Vec<TileView>,
    /// Moves resolved so far
    pub moves: u32,
    /// A move is mid-animation
    pub resolving: bool,
    /// Game over
    pub lost: bool,
}

impl BoardSnapshot {
    /// Capture the current frame.
    pub fn capture(state: &GameState) -> Self {
        let config = state.config();
        let geometry = state.board().geometry();

        let tiles = state
            .board()
            .tiles()
            .map(|tile| TileView {
                id: tile.id,
                value: tile.value,
                cell: tile.cell,
                x: tile.x,
                y: tile.y,
                color: tile_color(tile.value),
            })
            .collect();

        Self {
            width: config.width,
            height: config.height,
            tile_width: geometry.tile_width,
            tile_height: geometry.tile_height,
            rows: geometry.rows,
            cols: geometry.cols,
            tiles,
            moves: state.move_count(),
            resolving: matches!(state.phase(), GamePhase::Resolving(_)),
            lost: state.is_lost(),
        }
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
