//! Board components

use bevy::prelude::*;

use slide2048::game::tile::TileId;

/// Sprite drawing one engine tile
#[derive(Component)]
pub struct TileSprite {
    pub id: TileId,
    /// Value currently shown, so the label is only rewritten on merges
    pub value: u32,
}

/// Number drawn on a tile (child of its `TileSprite`)
#[derive(Component)]
pub struct TileLabel;

/// Grid line or border segment
#[derive(Component)]
pub struct GridLine;
