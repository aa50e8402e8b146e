//! UI module - game over overlay

use bevy::prelude::*;

use slide2048::game::palette::{BACKGROUND_COLOR, FONT_COLOR};

use crate::AppState;
use crate::game::{to_color, Game};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_systems(OnEnter(AppState::GameOver), setup_game_over)
            .add_systems(Update, handle_game_over_input.run_if(in_state(AppState::GameOver)))
            .add_systems(OnExit(AppState::GameOver), cleanup_game_over);
    }
}

/// Marker for game over UI
#[derive(Component)]
struct GameOverUI;

fn setup_game_over(mut commands: Commands, game: Res<Game>) {
    let board = game.0.board();
    let moves = game.0.move_count();
    let best = board.max_value();
    info!("Game Over! Best tile {best} after {moves} moves");

    commands.spawn((
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(to_color(BACKGROUND_COLOR).with_alpha(0.85)),
        GameOverUI,
    )).with_children(|parent| {
        parent.spawn((
            Text::new("GAME OVER"),
            TextFont {
                font_size: 64.0,
                ..default()
            },
            TextColor(to_color(FONT_COLOR)),
            Node {
                margin: UiRect::bottom(Val::Px(20.0)),
                ..default()
            },
        ));

        parent.spawn((
            Text::new(format!("Best tile: {best}    Moves: {moves}")),
            TextFont {
                font_size: 32.0,
                ..default()
            },
            TextColor(to_color(FONT_COLOR)),
            Node {
                margin: UiRect::bottom(Val::Px(40.0)),
                ..default()
            },
        ));

        parent.spawn((
            Text::new("Press R to play again or ESC to quit"),
            TextFont {
                font_size: 20.0,
                ..default()
            },
            TextColor(to_color(FONT_COLOR)),
        ));
    });
}

fn handle_game_over_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        next_state.set(AppState::Playing);
    }
}

fn cleanup_game_over(
    mut commands: Commands,
    query: Query<Entity, With<GameOverUI>>,
) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
