//! Slide 2048 Simulator
//!
//! Headless driver for the engine. Plays a seeded game with pseudo-random
//! moves, then replays the recorded moves and checks the state hashes match.

use anyhow::{bail, Context};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use slide2048::{
    DeterministicRng, Direction, GameConfig, GameState, MoveOutcome, SIM_MOVE_LIMIT, VERSION,
    game::{
        events::GameEventData,
        snapshot::BoardSnapshot,
        tick::{move_log_hash, replay_game, resolve_move},
    },
};

/// Seed used when neither the config nor the environment provides one
const DEFAULT_SEED: u64 = 12345;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    let config = GameConfig::from_env().context("invalid SLIDE2048_* configuration")?;

    info!("Slide 2048 Simulator v{}", VERSION);
    info!(
        "Board: {}x{} at {}x{} px, step {} px, {} fps",
        config.rows, config.cols, config.width, config.height, config.move_step, config.frame_rate
    );
    info!("Loss rule: {:?}, four chance: {}‰", config.loss_rule, config.spawn.four_per_mille);

    demo_game(config)
}

/// Play one game and verify it replays identically.
fn demo_game(config: GameConfig) -> anyhow::Result<()> {
    info!("=== Starting Demo Game ===");

    let seed = config.seed.unwrap_or(DEFAULT_SEED);
    info!("RNG Seed: {}", seed);

    let mut state = GameState::new(config.clone(), seed)?;
    // Move choice uses its own stream so it never perturbs the game RNG.
    let mut player = DeterministicRng::new(seed ^ 0x5EED_2048);
    let mut moves = Vec::new();
    let mut total_merges = 0;

    while !state.is_lost() && state.move_count() < SIM_MOVE_LIMIT {
        let direction = *player
            .choose(&Direction::ALL)
            .context("direction list is empty")?;
        let report = resolve_move(&mut state, direction)?;
        moves.push(direction);
        total_merges += report.merges;

        for event in state.take_events() {
            if let GameEventData::GameLost { moves: count, max_value } = event.data {
                info!("Game lost after {} moves, best tile {}", count, max_value);
            }
        }

        if state.move_count() % 100 == 0 {
            info!(
                "Move {}: {} tiles, best {}, {} merges so far",
                state.move_count(),
                state.board().len(),
                state.board().max_value(),
                total_merges
            );
        }

        if report.outcome == MoveOutcome::Lost {
            break;
        }
    }

    // Print final results
    info!("=== Game Results ===");
    info!("Moves: {}", state.move_count());
    info!("Best tile: {}", state.board().max_value());
    info!("Tile sum: {}", state.board().total_value());
    println!("{}", state.board());

    let hash = state.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));
    info!("Move Log Hash: {}", hex::encode(move_log_hash(&moves)));
    debug!("Snapshot: {}", BoardSnapshot::capture(&state).to_json()?);

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let (replayed, _) = replay_game(config, seed, &moves)?;
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash != replay_hash {
        bail!("DETERMINISM FAILURE: hashes differ");
    }
    info!("DETERMINISM VERIFIED: Hashes match!");
    Ok(())
}
