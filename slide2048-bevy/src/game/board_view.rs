//! Board rendering - grid lines and tile sprites
//!
//! The engine works in window pixels (origin top-left, y down); Bevy's 2D
//! camera is centred with y up. Everything drawn goes through [`to_world`].

use std::collections::BTreeMap;

use bevy::prelude::*;

use slide2048::game::palette::{FONT_COLOR, FONT_SIZE, OUTLINE_COLOR, OUTLINE_THICKNESS};
use slide2048::game::snapshot::{BoardSnapshot, TileView};

use super::{to_color, Game, GridLine, Settings, TileLabel, TileSprite};

const TILE_Z: f32 = 0.0;
const LABEL_Z: f32 = 1.0;
/// Grid lines are drawn over tiles
const GRID_Z: f32 = 10.0;

/// Window pixel → world position.
pub fn to_world(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(x - width / 2.0, height / 2.0 - y)
}

/// Centre of a line at `index * spacing`, pulled inside the window at the
/// two outer edges so the border is drawn at full thickness.
fn line_center(index: usize, spacing: i32, total: i32) -> f32 {
    let half = OUTLINE_THICKNESS as f32 / 2.0;
    ((index as i32 * spacing) as f32).clamp(half, total as f32 - half)
}

// ============================================================================
// GRID
// ============================================================================

/// Spawn the grid lines and border once at startup.
pub fn spawn_grid(mut commands: Commands, settings: Res<Settings>) {
    let config = &settings.config;
    let geometry = config.geometry();
    let (width, height) = (config.width as f32, config.height as f32);
    let thickness = OUTLINE_THICKNESS as f32;
    let color = to_color(OUTLINE_COLOR);

    for row in 0..=geometry.rows {
        let y = line_center(row, geometry.tile_height, config.height);
        commands.spawn((
            Sprite::from_color(color, Vec2::new(width, thickness)),
            Transform::from_translation(to_world(width / 2.0, y, width, height).extend(GRID_Z)),
            GridLine,
        ));
    }

    for col in 0..=geometry.cols {
        let x = line_center(col, geometry.tile_width, config.width);
        commands.spawn((
            Sprite::from_color(color, Vec2::new(thickness, height)),
            Transform::from_translation(to_world(x, height / 2.0, width, height).extend(GRID_Z)),
            GridLine,
        ));
    }
}

// ============================================================================
// TILES
// ============================================================================

fn tile_center(view: &TileView, snapshot: &BoardSnapshot) -> Vec2 {
    to_world(
        view.x as f32 + snapshot.tile_width as f32 / 2.0,
        view.y as f32 + snapshot.tile_height as f32 / 2.0,
        snapshot.width as f32,
        snapshot.height as f32,
    )
}

/// Mirror the engine's tiles: move and recolour existing sprites, despawn
/// absorbed tiles and spawn new ones.
pub fn sync_tiles(
    mut commands: Commands,
    game: Res<Game>,
    mut sprites: Query<(Entity, &mut TileSprite, &mut Transform, &mut Sprite, &Children)>,
    mut labels: Query<&mut Text2d, With<TileLabel>>,
) {
    let snapshot = BoardSnapshot::capture(&game.0);
    let mut pending: BTreeMap<_, _> = snapshot.tiles.iter().map(|view| (view.id, view)).collect();

    for (entity, mut tile, mut transform, mut sprite, children) in sprites.iter_mut() {
        let Some(view) = pending.remove(&tile.id) else {
            commands.entity(entity).despawn_recursive();
            continue;
        };

        transform.translation = tile_center(view, &snapshot).extend(TILE_Z);
        if tile.value != view.value {
            tile.value = view.value;
            sprite.color = to_color(view.color);
            for &child in children.iter() {
                if let Ok(mut label) = labels.get_mut(child) {
                    label.0 = view.value.to_string();
                }
            }
        }
    }

    let size = Vec2::new(snapshot.tile_width as f32, snapshot.tile_height as f32);
    for view in pending.into_values() {
        commands
            .spawn((
                TileSprite { id: view.id, value: view.value },
                Sprite::from_color(to_color(view.color), size),
                Transform::from_translation(tile_center(view, &snapshot).extend(TILE_Z)),
            ))
            .with_children(|parent| {
                parent.spawn((
                    Text2d::new(view.value.to_string()),
                    TextFont {
                        font_size: FONT_SIZE,
                        ..default()
                    },
                    TextColor(to_color(FONT_COLOR)),
                    Transform::from_xyz(0.0, 0.0, LABEL_Z),
                    TileLabel,
                ));
            });
    }
}
