//! Slide 2048 - Bevy front end
//!
//! Draws the engine's board, feeds it arrow-key moves and runs one
//! resolution pass per fixed-timestep frame.

mod game;
mod ui;

use bevy::prelude::*;
use bevy::window::WindowMode;
use bevy::render::camera::ScalingMode;

use slide2048::GameConfig;
use slide2048::game::palette::BACKGROUND_COLOR;

use game::{GamePlugin, Settings};
use ui::UiPlugin;

/// Game states
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    #[default]
    Playing,
    GameOver,
}

fn main() {
    let (config, config_error) = match GameConfig::from_env() {
        Ok(config) => (config, None),
        Err(err) => (GameConfig::default(), Some(err.to_string())),
    };

    App::new()
        // Bevy defaults with a fixed-size window matching the board
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "2048".into(),
                resolution: (config.width as f32, config.height as f32).into(),
                resizable: false,
                mode: WindowMode::Windowed,
                ..default()
            }),
            // Closing is routed through the engine so a sliding move finishes first
            close_when_requested: false,
            ..default()
        }))
        // One resolution pass per fixed step
        .insert_resource(Time::<Fixed>::from_hz(config.frame_rate as f64))
        .insert_resource(ClearColor(game::to_color(BACKGROUND_COLOR)))
        .insert_resource(Settings { config, config_error })
        // Game state
        .init_state::<AppState>()
        // Our plugins
        .add_plugins((
            GamePlugin,
            UiPlugin,
        ))
        // Startup
        .add_systems(Startup, setup_2d_camera)
        .run();
}

/// 2D camera framing exactly the board
fn setup_2d_camera(mut commands: Commands, settings: Res<Settings>) {
    commands.spawn((
        Camera2d,
        OrthographicProjection {
            scaling_mode: ScalingMode::FixedVertical {
                viewport_height: settings.config.height as f32,
            },
            ..OrthographicProjection::default_2d()
        },
    ));

    if let Some(err) = &settings.config_error {
        warn!("Ignoring SLIDE2048_* settings: {err}");
    }
    info!("Slide 2048 v{} initialized", slide2048::VERSION);
}
