//! Game module - engine state, input and the frame loop
//!
//! The engine owns every rule. This module only forwards key presses,
//! calls `tick` once per fixed step and reacts to what it reports.

use bevy::prelude::*;
use bevy::window::WindowCloseRequested;

use slide2048::game::events::GameEventData;
use slide2048::game::input::InputEvent;
use slide2048::game::palette::Rgb;
use slide2048::game::tick::tick;
use slide2048::{Direction, GameConfig, GameState};

use crate::AppState;

pub mod components;
pub mod board_view;

pub use components::*;

// ============================================================================
// GAME PLUGIN
// ============================================================================

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app
            // Board backdrop
            .add_systems(Startup, board_view::spawn_grid)

            // New game on every entry into Playing (start and restart)
            .add_systems(OnEnter(AppState::Playing), setup_game)

            // Input is read every frame, in any state, so Escape always works
            .add_systems(Update, read_input.run_if(resource_exists::<Game>))

            // Engine frame loop (fixed timestep = animation speed)
            .add_systems(FixedUpdate, run_tick.run_if(resource_exists::<Game>))

            // Visual updates (variable timestep)
            .add_systems(Update, board_view::sync_tiles.run_if(resource_exists::<Game>));
    }
}

// ============================================================================
// RESOURCES
// ============================================================================

/// Configuration loaded at launch
#[derive(Resource)]
pub struct Settings {
    pub config: GameConfig,
    /// Why the environment overrides were rejected, if they were
    pub config_error: Option<String>,
}

/// The running game
#[derive(Resource)]
pub struct Game(pub GameState);

/// Engine colour to Bevy colour
pub fn to_color(rgb: Rgb) -> Color {
    Color::srgb_u8(rgb.0, rgb.1, rgb.2)
}

// ============================================================================
// GAME SETUP
// ============================================================================

fn setup_game(
    mut commands: Commands,
    settings: Res<Settings>,
    tiles: Query<Entity, With<TileSprite>>,
) {
    // Tile ids restart with every game
    for entity in tiles.iter() {
        commands.entity(entity).despawn_recursive();
    }

    let seed = settings.config.seed.unwrap_or_else(rand::random);
    match GameState::new(settings.config.clone(), seed) {
        Ok(state) => {
            info!("New game, seed {seed}");
            commands.insert_resource(Game(state));
        }
        Err(err) => error!("Cannot start game: {err}"),
    }
}

// ============================================================================
// INPUT
// ============================================================================

fn read_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut close_requests: EventReader<WindowCloseRequested>,
    mut game: ResMut<Game>,
) {
    const KEYS: [(KeyCode, Direction); 4] = [
        (KeyCode::ArrowLeft, Direction::Left),
        (KeyCode::ArrowRight, Direction::Right),
        (KeyCode::ArrowUp, Direction::Up),
        (KeyCode::ArrowDown, Direction::Down),
    ];

    for (key, direction) in KEYS {
        if keyboard.just_pressed(key) {
            game.0.push_input(InputEvent::Move(direction));
        }
    }

    if keyboard.just_pressed(KeyCode::Escape) || close_requests.read().next().is_some() {
        game.0.push_input(InputEvent::Quit);
    }
}

// ============================================================================
// FRAME LOOP
// ============================================================================

fn run_tick(
    mut game: ResMut<Game>,
    state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
    mut exit: EventWriter<AppExit>,
) {
    let result = match tick(&mut game.0) {
        Ok(result) => result,
        Err(err) => {
            error!("Tick failed: {err}");
            return;
        }
    };

    for event in &result.events {
        match &event.data {
            GameEventData::MoveSettled { direction, passes, merges, .. } => {
                debug!("{direction} settled after {passes} passes, {merges} merges");
            }
            GameEventData::GameLost { moves, max_value } => {
                info!("Game lost after {moves} moves, best tile {max_value}");
            }
            _ => {}
        }
    }

    if result.lost && *state.get() == AppState::Playing {
        next_state.set(AppState::GameOver);
    }

    if result.quit {
        info!("Quitting");
        exit.send(AppExit::Success);
    }
}
