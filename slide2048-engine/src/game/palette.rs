//! Colours
//!
//! Fixed palette shared by every front end. Tile colours are indexed by
//! `log2(value) - 1`, so 2 is the first entry.

use serde::{Serialize, Deserialize};

use crate::game::tile::is_tile_value;

/// 8-bit RGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Tile colours for 2 through 512.
pub const TILE_COLORS: [Rgb; 9] = [
    Rgb(237, 229, 218),
    Rgb(238, 225, 201),
    Rgb(243, 178, 122),
    Rgb(246, 150, 101),
    Rgb(247, 124, 95),
    Rgb(247, 95, 59),
    Rgb(237, 208, 115),
    Rgb(237, 204, 99),
    Rgb(236, 202, 80),
];

/// Grid lines and border
pub const OUTLINE_COLOR: Rgb = Rgb(187, 173, 160);

/// Grid line thickness in pixels
pub const OUTLINE_THICKNESS: u32 = 10;

/// Empty cells
pub const BACKGROUND_COLOR: Rgb = Rgb(205, 192, 180);

/// Tile numbers
pub const FONT_COLOR: Rgb = Rgb(119, 110, 101);

/// Tile number size in points
pub const FONT_SIZE: f32 = 60.0;

/// Colour of a tile.
///
/// Values past 512 reuse the last colour.
///
/// # Panics
///
/// If `value` is not a power of two of at least 2. Legal play never
/// produces such a tile, so this means the board is corrupt.
pub fn tile_color(value: u32) -> Rgb {
    assert!(is_tile_value(value), "no colour for tile value {value}");
    let index = value.trailing_zeros() as usize - 1;
    TILE_COLORS[index.min(TILE_COLORS.len() - 1)]
}
